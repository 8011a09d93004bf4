use crate::config::types::{
    Config, CrawlerConfig, FetchConfig, OutputConfig, PoolConfig, UserAgentConfig,
};
use crate::url::parse_seed;
use crate::{ConfigError, UrlError};
use url::Url;

/// Validates the entire configuration
///
/// Called once after loading and again after command-line overrides, so a bad topology
/// is rejected before any worker starts.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_pool_config(&config.pool)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    validate_seeds(&config.seeds)?;
    Ok(())
}

/// Validates crawl size limits
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_processed_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_processed_pages must be >= 1, got {}",
            config.max_processed_pages
        )));
    }

    if config.max_found_urls < 1 {
        return Err(ConfigError::Validation(format!(
            "max_found_urls must be >= 1, got {}",
            config.max_found_urls
        )));
    }

    if config.max_reported_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_reported_pages must be >= 1, got {}",
            config.max_reported_pages
        )));
    }

    Ok(())
}

/// Validates the worker hierarchy sizes
fn validate_pool_config(config: &PoolConfig) -> Result<(), ConfigError> {
    if config.supervisors < 1 {
        return Err(ConfigError::Validation(format!(
            "supervisors must be >= 1, got {}",
            config.supervisors
        )));
    }

    if config.fetchers_per_supervisor < 1 {
        return Err(ConfigError::Validation(format!(
            "fetchers_per_supervisor must be >= 1, got {}",
            config.fetchers_per_supervisor
        )));
    }

    let expected = config.required_workers().ok_or_else(|| {
        ConfigError::Validation(format!(
            "pool of {} supervisors with {} fetchers each is too large",
            config.supervisors, config.fetchers_per_supervisor
        ))
    })?;

    if let Some(actual) = config.workers {
        if actual != expected {
            return Err(ConfigError::WorkerCount { expected, actual });
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates HTTP transport settings
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be between 1 and timeout_secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "results_dir cannot be empty".to_string(),
        ));
    }

    if matches!(&config.summary_path, Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates seed URLs
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    for seed in seeds {
        parse_seed(seed).map_err(|e| invalid_seed(seed, e))?;
    }
    Ok(())
}

/// Rewrites every seed into its parsed form
///
/// The scheme and host come out lowercased, an empty path becomes `/` and the
/// fragment is dropped, so `HTTP://A.test` is crawled and scoped as `http://a.test/`.
pub fn canonicalize_seeds(config: &mut Config) -> Result<(), ConfigError> {
    for seed in &mut config.seeds {
        let mut url = parse_seed(seed.as_str()).map_err(|e| invalid_seed(seed.as_str(), e))?;
        url.set_fragment(None);
        *seed = url.to_string();
    }
    Ok(())
}

fn invalid_seed(seed: &str, e: UrlError) -> ConfigError {
    ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e))
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
