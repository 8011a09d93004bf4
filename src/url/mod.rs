//! URL handling module for Hive-Crawl
//!
//! This module provides seed validation, href resolution, the crawl scope prefix and
//! filesystem-safe names derived from URLs.

mod domain;
mod normalize;
mod scope;

// Re-export main functions
pub use domain::safe_dir_name;
pub use normalize::{parse_seed, resolve_href};
pub use scope::Scope;
