/// Supervisor phase definitions for tracking one seed's crawl
///
/// A supervisor moves through these phases once per seed.
use std::fmt;

/// The phase a domain supervisor is in while crawling one seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupervisorPhase {
    /// Handing frontier URLs to idle fetchers
    Dispatching,

    /// Waiting for any busy fetcher to report back
    WaitingForCompletion,

    /// Dispatching has stopped; collecting results still in flight
    Draining,

    /// Terminate sent to every fetcher; collecting acknowledgements
    ShuttingDown,

    /// Every fetcher has exited and the report is finalized
    Done,
}

impl SupervisorPhase {
    /// Returns true if moving from this phase to `next` is allowed
    pub fn can_transition_to(&self, next: SupervisorPhase) -> bool {
        use SupervisorPhase::*;
        matches!(
            (self, next),
            (Dispatching, WaitingForCompletion)
                | (Dispatching, Draining)
                | (WaitingForCompletion, Dispatching)
                | (WaitingForCompletion, Draining)
                | (Draining, ShuttingDown)
                | (ShuttingDown, Done)
        )
    }

    /// Returns true if the phase still accepts new page results
    pub fn accepts_results(&self) -> bool {
        matches!(
            self,
            Self::Dispatching | Self::WaitingForCompletion | Self::Draining
        )
    }

    /// Returns true if this is the terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dispatching => "dispatching",
            Self::WaitingForCompletion => "waiting_for_completion",
            Self::Draining => "draining",
            Self::ShuttingDown => "shutting_down",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for SupervisorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
