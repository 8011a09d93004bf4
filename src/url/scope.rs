use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Scheme, host and at most one path segment
static SCOPE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^/]+(?:/[^/]+)?").expect("scope pattern is valid"));

/// The URL prefix that bounds one seed's crawl
///
/// The base is the seed's scheme, host and first path segment, taken as plain text. A URL
/// is in scope when its string starts with that base. This is a prefix test, not a host
/// comparison: `http://a.test` also admits `http://a.test.example/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    base: String,
}

impl Scope {
    /// Derives the scope base from a seed URL
    ///
    /// Falls back to the whole seed string when it does not look like an http(s) URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use hive_crawl::url::Scope;
    ///
    /// assert_eq!(Scope::for_seed("http://a.test/").as_str(), "http://a.test");
    /// assert_eq!(Scope::for_seed("https://a.test/docs/intro").as_str(), "https://a.test/docs");
    /// ```
    pub fn for_seed(seed: &str) -> Self {
        let base = SCOPE_PATTERN
            .find(seed)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| seed.to_string());
        Self { base }
    }

    /// Returns true if the URL string carries this scope's base as a prefix
    pub fn contains(&self, url: &str) -> bool {
        url.starts_with(&self.base)
    }

    /// The scope base text
    pub fn as_str(&self) -> &str {
        &self.base
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_seed_scope() {
        let scope = Scope::for_seed("http://a.test/");
        assert_eq!(scope.as_str(), "http://a.test");
        assert!(scope.contains("http://a.test/x"));
        assert!(!scope.contains("http://other.test/y"));
    }

    #[test]
    fn test_scope_keeps_first_path_segment() {
        let scope = Scope::for_seed("https://a.test/docs/guide/intro.html");
        assert_eq!(scope.as_str(), "https://a.test/docs");
        assert!(scope.contains("https://a.test/docs/other"));
        assert!(!scope.contains("https://a.test/blog/post"));
    }

    #[test]
    fn test_scope_without_trailing_slash() {
        let scope = Scope::for_seed("http://a.test");
        assert_eq!(scope.as_str(), "http://a.test");
    }

    #[test]
    fn test_scope_is_a_plain_prefix() {
        let scope = Scope::for_seed("http://a.test/");
        // Host equality is not checked
        assert!(scope.contains("http://a.test.example/page"));
        // Scheme is part of the prefix
        assert!(!scope.contains("https://a.test/x"));
    }

    #[test]
    fn test_non_http_seed_falls_back_to_whole_string() {
        let scope = Scope::for_seed("file:///tmp/index.html");
        assert_eq!(scope.as_str(), "file:///tmp/index.html");
    }
}
