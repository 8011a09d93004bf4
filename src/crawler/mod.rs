//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and HTML analysis
//! - The per-seed crawl session (frontier, visited set, report)
//! - The distributed hierarchy: coordinator, supervisors and fetchers
//! - The single-process serial mode

mod coordinator;
mod fetcher;
mod parser;
mod pool;
mod serial;
mod session;
mod supervisor;
mod worker;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpSource, PageSource};
pub use parser::{analyze_html, Extractor, HtmlExtractor};
pub use pool::{FetcherLink, WorkerPool};
pub use serial::{crawl_seed_serial, run_serial};
pub use session::{CrawlLimits, CrawlSession};
pub use supervisor::{crawl_seed, run_supervisor, spawn_supervisor, SupervisorContext};
pub use worker::{analyze_page, run_fetcher, spawn_fetcher, FetcherContext};

use crate::config::{validate, Config, CrawlMode};
use crate::output::{FsReportSink, GlobalReport, ReportSink};
use std::sync::Arc;

/// The collaborators a crawl runs against
#[derive(Clone)]
pub struct CrawlContext {
    pub source: Arc<dyn PageSource>,
    pub extractor: Arc<dyn Extractor>,
    pub sink: Arc<dyn ReportSink>,
}

impl CrawlContext {
    pub fn new(
        source: Arc<dyn PageSource>,
        extractor: Arc<dyn Extractor>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            source,
            extractor,
            sink,
        }
    }

    /// HTTP source, HTML extractor and filesystem sink built from configuration
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let source = HttpSource::from_config(&config.user_agent, &config.fetch)?;
        Ok(Self::new(
            Arc::new(source),
            Arc::new(HtmlExtractor),
            Arc::new(FsReportSink::new(&config.output.results_dir)),
        ))
    }
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. Depending on the configured mode
/// it either runs every seed inline or spins up the coordinator/supervisor/fetcher
/// hierarchy.
///
/// # Arguments
///
/// * `config` - The crawler configuration, checked with `validate` before any worker
///   starts
/// * `ctx` - The collaborators to crawl with
///
/// # Returns
///
/// * `Ok(GlobalReport)` - One summary entry per seed
/// * `Err(CrawlError)` - The configuration is invalid, a worker channel closed
///   unexpectedly or a task panicked
pub async fn crawl(config: &Config, ctx: CrawlContext) -> crate::Result<GlobalReport> {
    validate(config)?;
    let limits = CrawlLimits::from(&config.crawler);

    match config.crawler.mode {
        CrawlMode::Serial => Ok(run_serial(&config.seeds, limits, &ctx).await),
        CrawlMode::Distributed => {
            Coordinator::new(&config.pool, limits, ctx)
                .run(&config.seeds)
                .await
        }
    }
}
