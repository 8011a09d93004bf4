/// Characters replaced by an underscore in directory names
const UNSAFE_CHARS: &[char] = &['/', ':', '.', '?', '&', '=', ' ', '#'];

/// Converts a URL into a filesystem-safe directory name fragment
///
/// The scheme prefix is dropped and path, query and host separators are replaced with
/// underscores.
///
/// # Examples
///
/// ```
/// use hive_crawl::url::safe_dir_name;
///
/// assert_eq!(safe_dir_name("http://a.test/x?y=1"), "a_test_x_y_1");
/// ```
pub fn safe_dir_name(url: &str) -> String {
    let rest = match url.find("://") {
        Some(pos) => &url[pos + 3..],
        None => url,
    };

    rest.chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}
