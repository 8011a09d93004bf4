//! State module for the crawl data model
//!
//! # Components
//!
//! - `PageAnalysis` / `Header`: the per-page result produced by a fetcher
//! - `SupervisorPhase`: the phase a domain supervisor is in while crawling a seed

mod page;
mod phase;

// Re-export main types
pub use page::{Header, PageAnalysis};
pub use phase::SupervisorPhase;
