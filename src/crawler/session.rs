//! Per-seed crawl state shared by the serial and distributed modes
//!
//! This module handles:
//! - FIFO frontier management
//! - Visited-set deduplication (a URL is marked visited when it is enqueued)
//! - Scope filtering of discovered URLs
//! - Bounded result aggregation into a `DomainReport`

use crate::config::{
    CrawlerConfig, DEFAULT_MAX_FOUND_URLS, DEFAULT_MAX_PROCESSED_PAGES,
    DEFAULT_MAX_REPORTED_PAGES,
};
use crate::output::{DomainReport, FinishedReport};
use crate::protocol::PageOutcome;
use crate::url::Scope;
use std::collections::{HashSet, VecDeque};

/// Caps applied to one seed's crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    /// Results merged before dispatching stops
    pub max_processed_pages: usize,

    /// Found URLs a fetcher passes on per page
    pub max_found_urls: usize,

    /// Vertices written to the rendered report
    pub max_reported_pages: usize,
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self {
            max_processed_pages: DEFAULT_MAX_PROCESSED_PAGES,
            max_found_urls: DEFAULT_MAX_FOUND_URLS,
            max_reported_pages: DEFAULT_MAX_REPORTED_PAGES,
        }
    }
}

impl From<&CrawlerConfig> for CrawlLimits {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_processed_pages: config.max_processed_pages,
            max_found_urls: config.max_found_urls,
            max_reported_pages: config.max_reported_pages,
        }
    }
}

/// State of one seed's crawl, owned by a single task
///
/// Created when the seed starts and consumed by `finish`; nothing survives between
/// seeds.
#[derive(Debug)]
pub struct CrawlSession {
    scope: Scope,
    frontier: VecDeque<String>,
    visited: HashSet<String>,
    report: DomainReport,
    processed: usize,
    limits: CrawlLimits,
}

impl CrawlSession {
    /// Starts a session with the seed as the only frontier entry
    pub fn new(seed: &str, limits: CrawlLimits) -> Self {
        let mut session = Self {
            scope: Scope::for_seed(seed),
            frontier: VecDeque::new(),
            visited: HashSet::new(),
            report: DomainReport::new(seed),
            processed: 0,
            limits,
        };
        session.enqueue(seed.to_string());
        session
    }

    pub fn seed(&self) -> &str {
        self.report.seed()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Number of results merged so far, including failed fetches
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Number of URLs ever enqueued
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn report(&self) -> &DomainReport {
        &self.report
    }

    /// Returns true once the processed cap is reached
    pub fn cap_reached(&self) -> bool {
        self.processed >= self.limits.max_processed_pages
    }

    /// Returns true if another URL may be handed out right now
    pub fn can_dispatch(&self) -> bool {
        !self.frontier.is_empty() && !self.cap_reached()
    }

    /// Returns true while the dispatch loop should keep running
    ///
    /// `in_flight` is the number of tasks handed out whose results have not arrived.
    pub fn has_pending_work(&self, in_flight: usize) -> bool {
        (!self.frontier.is_empty() || in_flight > 0) && !self.cap_reached()
    }

    /// Pops the next URL to fetch, unless the frontier is empty or the cap is reached
    pub fn next_url(&mut self) -> Option<String> {
        if self.cap_reached() {
            return None;
        }
        self.frontier.pop_front()
    }

    /// Merges one page result
    ///
    /// Every result counts towards the processed cap. A failed fetch is not added to the
    /// report. Each found URL is enqueued if it is in scope and not yet visited.
    ///
    /// Returns the number of newly enqueued URLs.
    pub fn record(&mut self, outcome: PageOutcome) -> usize {
        self.processed += 1;

        if !outcome.fetched {
            tracing::debug!(
                "No content for {}, leaving it out of the report",
                outcome.analysis.url
            );
            return 0;
        }

        let mut added = 0;
        for url in &outcome.analysis.found_urls {
            if self.scope.contains(url) && self.enqueue(url.clone()) {
                added += 1;
            }
        }

        tracing::trace!(
            "Merged {} ({} new URLs, frontier {})",
            outcome.analysis.url,
            added,
            self.frontier.len()
        );

        self.report.insert(outcome.analysis);
        added
    }

    /// Renders the report at the vertex cap
    pub fn finish(self) -> FinishedReport {
        tracing::info!(
            "Finished {}: {} processed, {} visited, {} reported",
            self.report.seed(),
            self.processed,
            self.visited.len(),
            self.report.len().min(self.limits.max_reported_pages)
        );
        self.report.finish(self.limits.max_reported_pages)
    }

    fn enqueue(&mut self, url: String) -> bool {
        if !self.visited.insert(url.clone()) {
            return false;
        }
        self.frontier.push_back(url);
        true
    }
}
