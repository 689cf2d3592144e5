//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - GET requests to fetch page content
//! - Classifying responses into found / not found / failed
//! - Retry logic for transient failures

use crate::config::{CrawlerConfig, RetryConfig, UserAgentConfig, MAX_RETRY_DELAY};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// HTTP 200 with the page body
    Found { body: String },

    /// HTTP 404: no content here, do not retry, not a link source
    NotFound,

    /// Any other status or a network fault
    Failed { error: FetchError },
}

impl FetchResult {
    /// Returns true if this result should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Capability to fetch a single page
///
/// The crawl logic depends only on this contract, so tests can plug in
/// scripted fetchers instead of a real HTTP client.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// [`PageFetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from configuration
    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(crawler, user_agent)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// The request timeout bounds both connecting and reading the response.
///
/// # Example
///
/// ```no_run
/// use wiki_ranker::config::Config;
/// use wiki_ranker::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.crawler, &config.user_agent).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    let timeout = crawler.request_timeout();

    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once and classifies the response
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 | `Found` |
/// | HTTP 404 | `NotFound` |
/// | any other status | `Failed` (retryable) |
/// | timeout / connection error | `Failed` (retryable) |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return FetchResult::Failed { error: classify_error(url, &e) },
    };

    match response.status() {
        StatusCode::OK => match response.text().await {
            Ok(body) => FetchResult::Found { body },
            Err(e) => FetchResult::Failed {
                error: classify_error(url, &e),
            },
        },
        StatusCode::NOT_FOUND => FetchResult::NotFound,
        status => FetchResult::Failed {
            error: FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            },
        },
    }
}

fn classify_error(url: &str, error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// How many times and how patiently a failed fetch is retried
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, first one included (at least 1)
    pub max_attempts: u32,

    /// Delay before the first retry
    pub delay: Duration,

    /// Multiplier applied to the delay after every retry
    pub backoff: f64,
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt (1-based)
    ///
    /// Saturates at [`MAX_RETRY_DELAY`].
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.delay.as_secs_f64() * self.backoff.powi(exponent);
        Duration::try_from_secs_f64(secs)
            .unwrap_or(MAX_RETRY_DELAY)
            .min(MAX_RETRY_DELAY)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryConfig::default().into()
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: Duration::from_millis(config.delay),
            backoff: config.backoff,
        }
    }
}

/// Fetches with retries
///
/// Only `Failed` results are retried. After the last attempt the failure is
/// logged and returned to the caller, which owns the decision of what a
/// permanently failed URL means.
pub async fn fetch_with_retry(
    fetcher: &dyn PageFetcher,
    url: &str,
    policy: &RetryPolicy,
) -> FetchResult {
    let mut attempt = 1;

    loop {
        tracing::debug!("Fetching {} (attempt {}/{})", url, attempt, policy.max_attempts);
        let result = fetcher.fetch(url).await;

        let FetchResult::Failed { error } = &result else {
            return result;
        };

        if attempt >= policy.max_attempts {
            tracing::error!(
                "Giving up on {} after {} attempt(s): {}",
                url,
                attempt,
                error
            );
            return result;
        }

        let delay = policy.delay_after(attempt);
        tracing::warn!("Error: {}. Retrying {} in {:?}", error, url, delay);
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
