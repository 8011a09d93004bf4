//! Output sink traits and error types
//!
//! This module defines the interface the coordinator and the serial runner use to
//! persist finished seed reports.

use crate::output::FinishedReport;
use chrono::{DateTime, Local};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for report sinks
///
/// A sink receives every finished seed report of a run. Implementations must be safe to
/// share between tasks.
pub trait ReportSink: Send + Sync {
    /// Persists one finished report
    ///
    /// # Arguments
    ///
    /// * `report` - The finalized seed report
    /// * `run_started` - When the run that produced it started
    ///
    /// # Returns
    ///
    /// The name of the location the report was written to
    fn persist(&self, report: &FinishedReport, run_started: DateTime<Local>)
        -> OutputResult<String>;
}
