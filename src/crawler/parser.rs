//! HTML extractor for page analysis
//!
//! This module handles parsing HTML content to extract:
//! - Tag counts (images, links, forms)
//! - In-scope links to follow
//! - Headings in document order

use crate::state::{Header, PageAnalysis};
use crate::url::{resolve_href, Scope};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("img selector is valid"));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("link selector is valid"));
static FORM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("form").expect("form selector is valid"));
static HEADER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("header selector is valid")
});

/// Turns raw page content into a `PageAnalysis`
pub trait Extractor: Send + Sync {
    /// Analyzes one page
    ///
    /// # Arguments
    ///
    /// * `url` - The URL the content was fetched from
    /// * `content` - The raw page body
    /// * `scope` - The seed scope used to filter found URLs
    fn analyze(&self, url: &str, content: &str, scope: &Scope) -> PageAnalysis;
}

/// `Extractor` built on the `scraper` HTML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn analyze(&self, url: &str, content: &str, scope: &Scope) -> PageAnalysis {
        analyze_html(url, content, scope)
    }
}

/// Parses HTML content and summarizes it
///
/// # Link Rules
///
/// Every `<a href>` element counts towards `link_count`. Its href is resolved against the
/// page URL and kept in `found_urls` only if:
/// - it resolves to an http or https URL
/// - it is not a `javascript:`, `mailto:`, `tel:` or `data:` link, nor fragment-only
/// - the resolved URL (fragment stripped) starts with the scope base
///
/// Duplicates are kept; the supervisor dedups through its visited set.
///
/// # Example
///
/// ```
/// use hive_crawl::crawler::analyze_html;
/// use hive_crawl::url::Scope;
///
/// let html = r#"<h1>Hi</h1><a href="/x">x</a><a href="http://other.test/">o</a><img src="a.png">"#;
/// let analysis = analyze_html("http://a.test/", html, &Scope::for_seed("http://a.test/"));
/// assert_eq!(analysis.link_count, 2);
/// assert_eq!(analysis.found_urls, vec!["http://a.test/x"]);
/// assert_eq!(analysis.image_count, 1);
/// ```
pub fn analyze_html(url: &str, content: &str, scope: &Scope) -> PageAnalysis {
    let document = Html::parse_document(content);

    let (link_count, found_urls) = extract_links(&document, url, scope);

    PageAnalysis {
        url: url.to_string(),
        found_urls,
        image_count: count(&document, &IMG_SELECTOR),
        link_count,
        form_count: count(&document, &FORM_SELECTOR),
        headers: extract_headers(&document),
    }
}

fn count(document: &Html, selector: &Selector) -> u32 {
    document.select(selector).count() as u32
}

/// Counts `<a href>` elements and collects the in-scope ones
fn extract_links(document: &Html, page_url: &str, scope: &Scope) -> (u32, Vec<String>) {
    let base = Url::parse(page_url).ok();
    let mut link_count = 0;
    let mut found = Vec::new();

    for element in document.select(&LINK_SELECTOR) {
        link_count += 1;

        let (Some(base), Some(href)) = (base.as_ref(), element.value().attr("href")) else {
            continue;
        };
        if let Some(absolute_url) = resolve_href(href, base) {
            if scope.contains(&absolute_url) {
                found.push(absolute_url);
            }
        }
    }

    (link_count, found)
}

/// Collects `h1`..`h6` headings in document order
fn extract_headers(document: &Html) -> Vec<Header> {
    document
        .select(&HEADER_SELECTOR)
        .filter_map(|element| {
            let level = header_level(&element)?;
            Some(Header::new(level, header_text(&element)))
        })
        .collect()
}

fn header_level(element: &ElementRef<'_>) -> Option<u8> {
    element
        .value()
        .name()
        .strip_prefix('h')?
        .parse::<u8>()
        .ok()
        .filter(|level| (1..=6).contains(level))
}

/// Text of all descendant nodes, with whitespace runs collapsed so one heading stays on
/// one line of `content.txt`
fn header_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
