use crate::graph::InverterStrategy;
use serde::Deserialize;
use std::time::Duration;

/// Longest accepted per-request timeout, in seconds
pub const MAX_REQUEST_TIMEOUT_SECS: f64 = 600.0;

/// Longest wait between two fetch attempts
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(600);

/// Main configuration structure for Wiki-Ranker
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub inverter: InverterConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlerConfig {
    /// URL the crawl starts from
    #[serde(rename = "start-url", default)]
    pub start_url: Option<String>,

    /// Maximum number of pages recorded in the link map
    #[serde(rename = "page-limit", default = "default_page_limit")]
    pub page_limit: usize,

    /// Maximum number of concurrent fetch tasks per wave
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,

    /// Global ceiling on `max_workers`
    #[serde(rename = "max-request-rate", default = "default_max_request_rate")]
    pub max_request_rate: usize,

    /// Minimum wall-clock time a fetching task may take (milliseconds)
    #[serde(rename = "min-request-interval", default = "default_min_request_interval")]
    pub min_request_interval: u64,

    /// Connect/read timeout for a single request (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: f64,

    /// Path prefix of content-namespace links
    #[serde(rename = "link-prefix", default = "default_link_prefix")]
    pub link_prefix: String,
}

impl CrawlerConfig {
    /// Worker slots actually used per wave, capped by the request rate ceiling
    pub fn effective_workers(&self) -> usize {
        self.max_workers.min(self.max_request_rate)
    }

    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval)
    }

    /// Clamped to `0..=MAX_REQUEST_TIMEOUT_SECS`, so unvalidated values never panic
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.request_timeout.min(MAX_REQUEST_TIMEOUT_SECS).max(0.0))
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: None,
            page_limit: default_page_limit(),
            max_workers: default_max_workers(),
            max_request_rate: default_max_request_rate(),
            min_request_interval: default_min_request_interval(),
            request_timeout: default_request_timeout(),
            link_prefix: default_link_prefix(),
        }
    }
}

/// Retry policy for transient fetch failures
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total number of attempts per URL, first one included
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (milliseconds)
    #[serde(default = "default_retry_delay")]
    pub delay: u64,

    /// Multiplier applied to the delay after every retry
    #[serde(default = "default_backoff")]
    pub backoff: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay: default_retry_delay(),
            backoff: default_backoff(),
        }
    }
}

/// Graph inversion configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InverterConfig {
    /// Strategy used when the CLI does not pick one
    #[serde(default)]
    pub strategy: InverterStrategy,

    /// Thread-pool size for the threaded strategy
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Worker process count for the process strategy
    #[serde(default = "default_processes")]
    pub processes: usize,
}

impl Default for InverterConfig {
    fn default() -> Self {
        Self {
            strategy: InverterStrategy::default(),
            threads: default_threads(),
            processes: default_processes(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

fn default_page_limit() -> usize {
    1000
}

// one worker does roughly one request per second
fn default_max_workers() -> usize {
    200
}

fn default_max_request_rate() -> usize {
    200
}

fn default_min_request_interval() -> u64 {
    1000
}

fn default_request_timeout() -> f64 {
    5.0
}

fn default_link_prefix() -> String {
    "/wiki/".to_string()
}

fn default_max_attempts() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    1000
}

fn default_backoff() -> f64 {
    1.0
}

fn default_threads() -> usize {
    100
}

fn default_processes() -> usize {
    20
}

fn default_crawler_name() -> String {
    "WikiRanker".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
