//! Configuration module for Hive-Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use hive_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Workers needed: {:?}", config.pool.required_workers());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlMode, CrawlerConfig, FetchConfig, OutputConfig, PoolConfig, UserAgentConfig,
    DEFAULT_MAX_FOUND_URLS, DEFAULT_MAX_PROCESSED_PAGES, DEFAULT_MAX_REPORTED_PAGES,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{canonicalize_seeds, validate};
