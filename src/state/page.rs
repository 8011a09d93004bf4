//! Page analysis data shared between fetchers, supervisors and the serial runner
//!
//! A `PageAnalysis` is produced once per fetched page and never changed afterwards.

/// A heading found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Heading level, 1 through 6
    pub level: u8,

    /// Heading text with nested tags stripped
    pub text: String,
}

impl Header {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    /// Renders the heading as `<level dashes> <text>`
    pub fn render(&self) -> String {
        format!("{} {}", "-".repeat(self.level as usize), self.text)
    }
}

/// Structured summary of one fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageAnalysis {
    /// The page URL as it was dispatched
    pub url: String,

    /// In-scope URLs discovered on the page, in document order
    pub found_urls: Vec<String>,

    /// Number of `<img>` elements
    pub image_count: u32,

    /// Number of `<a href>` elements
    pub link_count: u32,

    /// Number of `<form>` elements
    pub form_count: u32,

    /// Headings in document order
    pub headers: Vec<Header>,
}

impl PageAnalysis {
    /// Creates an analysis with zero counts, used when a page could not be fetched
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Truncates the found URL list to at most `max` entries
    ///
    /// Returns the number of URLs dropped.
    pub fn cap_found_urls(&mut self, max: usize) -> usize {
        let dropped = self.found_urls.len().saturating_sub(max);
        self.found_urls.truncate(max);
        dropped
    }
}
