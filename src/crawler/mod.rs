//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - HTML parsing and article link extraction
//! - Worker slots and per-task pacing
//! - The wave-based frontier accumulator

mod fetcher;
mod frontier;
mod parser;
mod scheduler;

pub use fetcher::{
    build_http_client, fetch_url, fetch_with_retry, FetchResult, HttpFetcher, PageFetcher,
    RetryPolicy,
};
pub use frontier::Frontier;
pub use parser::{ArticleLinkExtractor, LinkExtractor, DEFAULT_LINK_PREFIX};
pub use scheduler::{pace, ScheduledFetch, Scheduler};

use crate::config::Config;
use crate::graph::LinkMap;
use crate::Result;
use std::sync::Arc;

/// Runs a complete crawl and returns its link map
///
/// This is the main entry point for crawling. It will:
/// 1. Build the HTTP fetcher from the user agent and timeout settings
/// 2. Build the article link extractor for the configured prefix
/// 3. Crawl in waves until `page_limit` pages are linked or the site dead-ends
///
/// # Arguments
///
/// * `start_url` - Absolute URL the crawl starts from
/// * `page_limit` - Maximum number of pages in the returned link map
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(LinkMap)` - Page URL to outbound links, at most `page_limit` entries
/// * `Err(RankerError)` - The HTTP client or start URL was unusable
pub async fn run(start_url: &str, page_limit: usize, config: &Config) -> Result<LinkMap> {
    let mut frontier = build_frontier(start_url, page_limit, config)?;
    frontier.run().await;

    Ok(frontier.into_link_map())
}

/// Builds a frontier wired to the HTTP fetcher and article link extractor
pub fn build_frontier(start_url: &str, page_limit: usize, config: &Config) -> Result<Frontier> {
    let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent)?;
    let extractor = ArticleLinkExtractor::new(config.crawler.link_prefix.clone());
    let policy = RetryPolicy::from(config.retry.clone());

    Frontier::new(
        start_url,
        page_limit,
        &config.crawler,
        &policy,
        Arc::new(fetcher),
        Arc::new(extractor),
    )
}
