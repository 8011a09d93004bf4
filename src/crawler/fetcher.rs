//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Error classification for logging
//!
//! Failures are never retried here. Whatever goes wrong, a `PageSource` answers `None`
//! and the page is treated as empty.

use crate::config::{FetchConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Something that can produce the raw content of a URL
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the page body
    ///
    /// Returns `None` on any failure: unsupported scheme, non-success status, network
    /// error or unreadable body.
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The URL is not http or https
    UnsupportedScheme,

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use hive_crawl::config::{FetchConfig, UserAgentConfig};
/// use hive_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetch: &FetchConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(fetch.timeout_secs))
        .connect_timeout(Duration::from_secs(fetch.connect_timeout_secs))
        .redirect(Policy::limited(fetch.max_redirects))
        .danger_accept_invalid_certs(fetch.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | Scheme other than http/https | UnsupportedScheme |
/// | Any non-2xx status after redirects | HttpError |
/// | Connection refused, timeout, TLS error | NetworkError |
/// | Body cannot be read as text | NetworkError |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    // Url lowercases the scheme, so `HTTP://` passes as well
    if let Ok(parsed) = Url::parse(url) {
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return FetchResult::UnsupportedScheme;
        }
    }

    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            };
            FetchResult::NetworkError { error }
        }
    }
}

/// `PageSource` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration
    pub fn from_config(
        user_agent: &UserAgentConfig,
        fetch: &FetchConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, fetch)?))
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch(&self, url: &str) -> Option<String> {
        match fetch_url(&self.client, url).await {
            FetchResult::Success {
                final_url, body, ..
            } => {
                if final_url != url {
                    tracing::trace!("{} redirected to {}", url, final_url);
                }
                Some(body)
            }
            FetchResult::UnsupportedScheme => {
                tracing::debug!("Skipping {}: unsupported scheme", url);
                None
            }
            FetchResult::HttpError { status_code } => {
                tracing::debug!("Fetch of {} returned HTTP {}", url, status_code);
                None
            }
            FetchResult::NetworkError { error } => {
                tracing::debug!("Fetch of {} failed: {}", url, error);
                None
            }
        }
    }
}
