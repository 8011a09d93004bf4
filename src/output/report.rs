//! Per-seed report accumulation and rendering
//!
//! A `DomainReport` grows while a seed is crawled and is finalized exactly once into a
//! `FinishedReport`, whose `map` and `content` text is what lands on disk.

use crate::state::PageAnalysis;
use std::collections::{HashMap, HashSet};
use std::fmt::Write;

/// Insertion-ordered page results for one seed
#[derive(Debug, Clone)]
pub struct DomainReport {
    seed: String,
    pages: Vec<PageAnalysis>,
    index: HashMap<String, usize>,
}

impl DomainReport {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            pages: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Records a page result
    ///
    /// A second result for the same URL replaces the first in place. Returns true if the
    /// URL was new to the report.
    pub fn insert(&mut self, analysis: PageAnalysis) -> bool {
        match self.index.get(&analysis.url) {
            Some(&pos) => {
                self.pages[pos] = analysis;
                false
            }
            None => {
                self.index.insert(analysis.url.clone(), self.pages.len());
                self.pages.push(analysis);
                true
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn get(&self, url: &str) -> Option<&PageAnalysis> {
        self.index.get(url).map(|&pos| &self.pages[pos])
    }

    /// URLs in the order they were first recorded
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|p| p.url.as_str())
    }

    /// Renders the report, keeping only the first `max_vertices` pages recorded
    pub fn finish(self, max_vertices: usize) -> FinishedReport {
        let kept = &self.pages[..self.pages.len().min(max_vertices)];
        if kept.len() < self.pages.len() {
            tracing::debug!(
                "Report for {} truncated from {} to {} vertices",
                self.seed,
                self.pages.len(),
                kept.len()
            );
        }

        FinishedReport {
            map: render_map(kept),
            content: render_content(kept),
            vertices: kept.len(),
            pages_crawled: self.pages.len(),
            seed: self.seed,
        }
    }
}

/// A finalized seed report, ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedReport {
    /// The seed this report belongs to
    pub seed: String,

    /// Vertex lines followed by edge lines
    pub map: String,

    /// Per-page content blocks
    pub content: String,

    /// Number of vertices written to `map`
    pub vertices: usize,

    /// Number of pages recorded before truncation
    pub pages_crawled: usize,
}

impl FinishedReport {
    /// Vertex URLs listed in the map, in order
    pub fn vertex_urls(&self) -> Vec<&str> {
        self.map
            .lines()
            .take(self.vertices)
            .collect()
    }

    /// `(source, target)` pairs listed in the map, in order
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.map
            .lines()
            .skip(self.vertices)
            .filter_map(|line| line.split_once(' '))
            .collect()
    }
}

/// One line per vertex, then `"<source> <target>"` per link whose target is a vertex
fn render_map(pages: &[PageAnalysis]) -> String {
    let vertices: HashSet<&str> = pages.iter().map(|p| p.url.as_str()).collect();
    let mut out = String::new();

    for page in pages {
        out.push_str(&page.url);
        out.push('\n');
    }

    for page in pages {
        for target in &page.found_urls {
            if vertices.contains(target.as_str()) {
                let _ = writeln!(out, "{} {}", page.url, target);
            }
        }
    }

    out
}

/// Per page: URL, counts, one line per heading, then a blank line
fn render_content(pages: &[PageAnalysis]) -> String {
    let mut out = String::new();

    for page in pages {
        let _ = writeln!(out, "{}", page.url);
        let _ = writeln!(out, "IMAGES {}", page.image_count);
        let _ = writeln!(out, "LINKS {}", page.link_count);
        let _ = writeln!(out, "FORMS {}", page.form_count);
        for header in &page.headers {
            let _ = writeln!(out, "{}", header.render());
        }
        out.push('\n');
    }

    out
}
