use serde::Deserialize;

/// Pages a supervisor processes for one seed before it stops dispatching
pub const DEFAULT_MAX_PROCESSED_PAGES: usize = 100;

/// Discovered URLs a fetcher keeps per page
pub const DEFAULT_MAX_FOUND_URLS: usize = 100;

/// Vertices written to one seed's report
pub const DEFAULT_MAX_REPORTED_PAGES: usize = 1000;

/// Main configuration structure for Hive-Crawl
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed URLs, each crawled independently
    pub seeds: Vec<String>,
    pub crawler: CrawlerConfig,
    pub pool: PoolConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

/// Which execution mode runs the crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    /// One task crawls every seed in turn
    Serial,

    /// Coordinator, supervisors and fetchers as separate tasks
    #[default]
    Distributed,
}

/// Crawl size limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    pub mode: CrawlMode,

    /// Maximum pages processed per seed
    #[serde(rename = "max-processed-pages")]
    pub max_processed_pages: usize,

    /// Maximum discovered URLs kept per page
    #[serde(rename = "max-found-urls")]
    pub max_found_urls: usize,

    /// Maximum vertices serialized per seed report
    #[serde(rename = "max-reported-pages")]
    pub max_reported_pages: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            mode: CrawlMode::default(),
            max_processed_pages: DEFAULT_MAX_PROCESSED_PAGES,
            max_found_urls: DEFAULT_MAX_FOUND_URLS,
            max_reported_pages: DEFAULT_MAX_REPORTED_PAGES,
        }
    }
}

/// Worker hierarchy sizes for the distributed mode
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of domain supervisors (N)
    pub supervisors: usize,

    /// Number of page fetchers per supervisor (M)
    #[serde(rename = "fetchers-per-supervisor")]
    pub fetchers_per_supervisor: usize,

    /// Total workers provisioned, checked against `1 + N + N*M` when set
    pub workers: Option<usize>,
}

impl PoolConfig {
    /// Number of workers the topology needs: one coordinator, N supervisors and
    /// N*M fetchers
    ///
    /// Returns None if the count does not fit in a `usize`.
    pub fn required_workers(&self) -> Option<usize> {
        self.supervisors
            .checked_mul(self.fetchers_per_supervisor)?
            .checked_add(self.supervisors)?
            .checked_add(1)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            supervisors: 2,
            fetchers_per_supervisor: 4,
            workers: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "hive-crawl".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Redirect hops followed before giving up
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// Skip TLS certificate verification
    #[serde(rename = "accept-invalid-certs")]
    pub accept_invalid_certs: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 10,
            accept_invalid_certs: false,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives one sub-directory per crawled seed
    #[serde(rename = "results-dir")]
    pub results_dir: String,

    /// Where to write the HTML run summary, if anywhere
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: "results".to_string(),
            summary_path: None,
        }
    }
}
