//! Single-process crawl mode
//!
//! Runs the same `CrawlSession` algorithm as the supervisors, fetching one page at a
//! time on the calling task.

use crate::crawler::session::{CrawlLimits, CrawlSession};
use crate::crawler::worker::analyze_page;
use crate::crawler::CrawlContext;
use crate::output::{persist_report, FinishedReport, GlobalReport};
use crate::protocol::PageOutcome;
use chrono::Local;

/// Crawls every seed in order and persists each report as it finishes
pub async fn run_serial(
    seeds: &[String],
    limits: CrawlLimits,
    ctx: &CrawlContext,
) -> GlobalReport {
    let started = Local::now();
    let mut global = GlobalReport::new(started);

    if seeds.is_empty() {
        tracing::info!("No URLs to process");
        return global;
    }

    for seed in seeds {
        tracing::info!("Crawling {}", seed);
        let report = crawl_seed_serial(seed, limits, ctx).await;
        global.push(persist_report(ctx.sink.as_ref(), &report, started));
    }

    global
}

/// Crawls one seed without any worker tasks
pub async fn crawl_seed_serial(
    seed: &str,
    limits: CrawlLimits,
    ctx: &CrawlContext,
) -> FinishedReport {
    let mut session = CrawlSession::new(seed, limits);
    let scope = session.scope().clone();

    while let Some(url) = session.next_url() {
        let (analysis, fetched) = analyze_page(
            ctx.source.as_ref(),
            ctx.extractor.as_ref(),
            &url,
            &scope,
            limits.max_found_urls,
        )
        .await;

        session.record(PageOutcome {
            fetcher: 0,
            analysis,
            fetched,
        });
    }

    session.finish()
}
