//! Hive-Crawl: a prefix-scoped web crawler with a two-level worker hierarchy
//!
//! A coordinator hands seed URLs to domain supervisors, and each supervisor drives a pool
//! of page fetchers over typed channels. The same crawl session algorithm backs a
//! single-process mode, so both modes produce the same page graph for a seed.

pub mod config;
pub mod crawler;
pub mod output;
pub mod protocol;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Hive-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Channel error: {0}")]
    Channel(#[from] protocol::ChannelError),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::SupervisorPhase,
        to: state::SupervisorPhase,
    },

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Worker count mismatch: topology needs {expected} workers but {actual} were provided")]
    WorkerCount { expected: usize, actual: usize },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Hive-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use output::{FinishedReport, GlobalReport};
pub use state::{Header, PageAnalysis, SupervisorPhase};
pub use url::Scope;
