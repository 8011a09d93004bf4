//! Message kinds exchanged across the worker hierarchy
//!
//! Within one task/result cycle a fetcher always answers in the same order:
//! `Analyzed` followed by `Idle`. A `ShutdownAck` is only ever sent in reply to
//! `Task::Terminate`.

use crate::output::FinishedReport;
use crate::state::PageAnalysis;

/// Identity of a fetcher within its supervisor's pool
pub type FetcherId = usize;

/// Identity of a supervisor within the coordinator's pool
pub type SupervisorId = usize;

/// Supervisor → fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Fetch and analyze one URL
    Fetch(String),

    /// No more work; acknowledge and exit
    Terminate,
}

/// The result of one fetch task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    /// The fetcher that processed the task
    pub fetcher: FetcherId,

    /// The page analysis; zero counts when the page could not be fetched
    pub analysis: PageAnalysis,

    /// False when the fetch produced no content
    pub fetched: bool,
}

/// Fetcher → supervisor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetcherEvent {
    /// One whole page result
    Analyzed(PageOutcome),

    /// The fetcher is ready for another task
    Idle(FetcherId),

    /// The fetcher received `Task::Terminate` and has exited
    ShutdownAck(FetcherId),
}

/// Coordinator → supervisor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorCommand {
    /// Crawl one seed and report back
    Crawl(String),

    /// No more seeds; exit once queued seeds are done
    Terminate,
}

/// Supervisor → coordinator
#[derive(Debug)]
pub enum SupervisorEvent {
    /// A seed's crawl finished and its report is rendered
    Finished(FinishedReport),

    /// A seed's crawl was aborted; the seed is still accounted for
    Failed { seed: String, error: String },
}

impl SupervisorEvent {
    /// The seed this event accounts for
    pub fn seed(&self) -> &str {
        match self {
            Self::Finished(report) => &report.seed,
            Self::Failed { seed, .. } => seed,
        }
    }
}
