use crate::config::types::{
    Config, CrawlerConfig, InverterConfig, RetryConfig, UserAgentConfig, MAX_REQUEST_TIMEOUT_SECS,
    MAX_RETRY_DELAY,
};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Upper bound on concurrent fetch tasks per wave
const MAX_WORKERS_CEILING: usize = 1000;

/// Upper bound on fetch attempts per URL
const MAX_ATTEMPTS_CEILING: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_retry_config(&config.retry)?;
    validate_inverter_config(&config.inverter)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if let Some(start_url) = &config.start_url {
        validate_start_url(start_url)?;
    }

    if config.page_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "page_limit must be >= 1, got {}",
            config.page_limit
        )));
    }

    if config.max_workers < 1 || config.max_workers > MAX_WORKERS_CEILING {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between 1 and {}, got {}",
            MAX_WORKERS_CEILING, config.max_workers
        )));
    }

    if config.max_request_rate < 1 {
        return Err(ConfigError::Validation(format!(
            "max_request_rate must be >= 1, got {}",
            config.max_request_rate
        )));
    }

    if !config.request_timeout.is_finite() || config.request_timeout <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be a positive number of seconds, got {}",
            config.request_timeout
        )));
    }

    if config.request_timeout > MAX_REQUEST_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be at most {}s, got {}",
            MAX_REQUEST_TIMEOUT_SECS, config.request_timeout
        )));
    }

    if !config.link_prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "link_prefix must start with '/', got '{}'",
            config.link_prefix
        )));
    }

    Ok(())
}

/// Validates a crawl seed: absolute http(s) URL with a host
pub fn validate_start_url(start_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' must use http or https",
            start_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' has no host",
            start_url
        )));
    }

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > MAX_ATTEMPTS_CEILING {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and {}, got {}",
            MAX_ATTEMPTS_CEILING, config.max_attempts
        )));
    }

    if !config.backoff.is_finite() || config.backoff < 1.0 {
        return Err(ConfigError::Validation(format!(
            "backoff must be >= 1.0, got {}",
            config.backoff
        )));
    }

    // Longest wait happens before the last attempt
    let retries = config.max_attempts.saturating_sub(1) as i32;
    let longest = Duration::from_millis(config.delay).as_secs_f64()
        * config.backoff.powi(retries.saturating_sub(1).max(0));
    if retries > 0 && (!longest.is_finite() || longest > MAX_RETRY_DELAY.as_secs_f64()) {
        return Err(ConfigError::Validation(format!(
            "retry delay grows to {:.0}s with backoff {} over {} attempts, at most {}s allowed",
            longest,
            config.backoff,
            config.max_attempts,
            MAX_RETRY_DELAY.as_secs()
        )));
    }

    Ok(())
}

/// Validates inverter configuration
fn validate_inverter_config(config: &InverterConfig) -> Result<(), ConfigError> {
    if config.threads < 1 {
        return Err(ConfigError::Validation(
            "threads must be >= 1".to_string(),
        ));
    }

    if config.processes < 1 {
        return Err(ConfigError::Validation(
            "processes must be >= 1".to_string(),
        ));
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

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}
