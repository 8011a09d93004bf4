//! Output module for seed reports and run summaries
//!
//! This module handles:
//! - Accumulating and rendering per-seed reports (`map.txt`, `content.txt`)
//! - Persisting them to timestamped directories with a `log.txt`
//! - Summarizing a whole run as HTML

mod report;
mod summary;
mod traits;
mod writer;

pub use report::{DomainReport, FinishedReport};
pub use summary::{GlobalReport, SeedSummary};
pub use traits::{OutputError, OutputResult, ReportSink};
pub use writer::{FsReportSink, CONTENT_FILE_NAME, LOG_FILE_NAME, LOG_TIME_FORMAT, MAP_FILE_NAME};

use chrono::{DateTime, Local};

/// Persists a finished report and turns the outcome into a summary line
///
/// A failed write is logged and recorded in the summary; it never aborts the run.
pub fn persist_report(
    sink: &dyn ReportSink,
    report: &FinishedReport,
    run_started: DateTime<Local>,
) -> SeedSummary {
    match sink.persist(report, run_started) {
        Ok(dir) => {
            tracing::info!(
                "Saved {} ({} pages) to {}",
                report.seed,
                report.vertices,
                dir
            );
            SeedSummary::saved(&report.seed, dir, report.vertices)
        }
        Err(e) => {
            tracing::warn!("Failed to persist report for {}: {}", report.seed, e);
            SeedSummary::failed(&report.seed, format!("failed to save results: {}", e))
        }
    }
}
