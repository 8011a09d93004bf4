//! Run-level summary of every seed report
//!
//! The HTML rendering is the same response the crawler's submission page shows.

use crate::output::traits::{OutputError, OutputResult};
use chrono::{DateTime, Local};
use html_escape::encode_text;
use std::path::Path;

/// Outcome of one seed within a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    /// The seed URL
    pub seed: String,

    /// Directory the report was written to, if it was written
    pub directory: Option<String>,

    /// Human-readable status line
    pub status: String,
}

impl SeedSummary {
    pub fn saved(seed: impl Into<String>, directory: impl Into<String>, pages: usize) -> Self {
        Self {
            seed: seed.into(),
            directory: Some(directory.into()),
            status: format!("OK ({} pages)", pages),
        }
    }

    pub fn failed(seed: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            directory: None,
            status: reason.into(),
        }
    }

    pub fn is_saved(&self) -> bool {
        self.directory.is_some()
    }
}

/// Summary of every seed handled by one run, in completion order
#[derive(Debug, Clone)]
pub struct GlobalReport {
    pub started_at: DateTime<Local>,
    pub entries: Vec<SeedSummary>,
}

impl GlobalReport {
    pub fn new(started_at: DateTime<Local>) -> Self {
        Self {
            started_at,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: SeedSummary) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of seeds whose report could not be produced or written
    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_saved()).count()
    }

    /// Looks up the entries recorded for a seed
    pub fn entries_for<'a>(&'a self, seed: &'a str) -> impl Iterator<Item = &'a SeedSummary> {
        self.entries.iter().filter(move |e| e.seed == seed)
    }

    /// Renders the summary as an HTML fragment
    pub fn to_html(&self) -> String {
        if self.entries.is_empty() {
            return "<h2>No URLs to process</h2>".to_string();
        }

        let mut html = String::from("<h2>Crawl results</h2><ul>");
        for entry in &self.entries {
            match &entry.directory {
                Some(dir) => html.push_str(&format!(
                    "<li>Processed URL: {} - results saved in {}</li>",
                    encode_text(&entry.seed),
                    encode_text(dir)
                )),
                None => html.push_str(&format!(
                    "<li>Failed URL: {} - {}</li>",
                    encode_text(&entry.seed),
                    encode_text(&entry.status)
                )),
            }
        }
        html.push_str("</ul>");
        html
    }

    /// Writes the HTML summary to a file
    pub fn write_html(&self, path: &Path) -> OutputResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_html()).map_err(|e| OutputError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary_html() {
        let report = GlobalReport::new(Local::now());
        assert!(report.is_empty());
        assert_eq!(report.to_html(), "<h2>No URLs to process</h2>");
    }

    #[test]
    fn test_summary_lines() {
        let mut report = GlobalReport::new(Local::now());
        report.push(SeedSummary::saved("http://a.test/", "2024_01_01_00_00_a_test_", 3));
        report.push(SeedSummary::failed("http://b.test/?x=1&y=2", "write failed"));

        let html = report.to_html();
        assert!(html.starts_with("<h2>Crawl results</h2><ul>"));
        assert!(html.contains(
            "<li>Processed URL: http://a.test/ - results saved in 2024_01_01_00_00_a_test_</li>"
        ));
        assert!(html.contains("<li>Failed URL: http://b.test/?x=1&amp;y=2 - write failed</li>"));
        assert!(html.ends_with("</ul>"));
        assert_eq!(report.failures(), 1);
    }

    #[test]
    fn test_entries_for_seed() {
        let mut report = GlobalReport::new(Local::now());
        report.push(SeedSummary::saved("http://a.test/", "one", 1));
        report.push(SeedSummary::saved("http://b.test/", "two", 1));
        report.push(SeedSummary::saved("http://a.test/", "three", 1));

        let dirs: Vec<_> = report
            .entries_for("http://a.test/")
            .filter_map(|e| e.directory.as_deref())
            .collect();
        assert_eq!(dirs, vec!["one", "three"]);
    }

    #[test]
    fn test_write_html() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("summary.html");
        let mut report = GlobalReport::new(Local::now());
        report.push(SeedSummary::saved("http://a.test/", "dir", 1));

        report.write_html(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), report.to_html());
    }
}
