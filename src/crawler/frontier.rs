//! Frontier accumulator - wave-based crawl orchestration
//!
//! The frontier crawls breadth-first in waves:
//! - take a slice of the pending pool sized to the remaining need
//! - run one task per URL, bounded by the scheduler's worker slots
//! - wait for every task of the wave before starting the next one
//!
//! It stops when the link map holds `page_limit` pages or nothing is left
//! to crawl. A failing URL only ends its own task.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{fetch_with_retry, FetchResult, PageFetcher, RetryPolicy};
use crate::crawler::parser::LinkExtractor;
use crate::crawler::scheduler::{pace, ScheduledFetch, Scheduler};
use crate::graph::LinkMap;
use crate::output::CrawlStatistics;
use crate::state::{lock_state, CrawlState, FrontierPhase, SharedCrawlState, UrlOutcome};
use crate::url::{normalize_links, normalize_url, site_mask};
use crate::Result;
use std::sync::{Arc, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use url::Url;

/// Progress is logged every this many completed tasks
const PROGRESS_INTERVAL: u64 = 10;

/// Collaborators and settings shared by every task of a crawl
struct TaskContext {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn LinkExtractor>,
    mask: Url,
    policy: RetryPolicy,
    page_limit: usize,
    min_interval: Duration,
}

/// Breadth-first crawl accumulator
pub struct Frontier {
    start_url: String,
    context: Arc<TaskContext>,
    state: SharedCrawlState,
    scheduler: Scheduler,
    phase: FrontierPhase,
    stats: CrawlStatistics,
}

impl Frontier {
    /// Creates a frontier with only `start_url` pending
    ///
    /// The start URL is canonicalized like every discovered link so that
    /// back-links to it are recognized as already visited.
    ///
    /// # Arguments
    ///
    /// * `start_url` - Absolute http(s) URL the crawl starts from
    /// * `page_limit` - Maximum number of pages in the link map
    /// * `config` - Worker and pacing settings
    /// * `policy` - Retry policy applied to every fetch
    /// * `fetcher` - Page fetching capability
    /// * `extractor` - Link extraction capability
    ///
    /// # Returns
    ///
    /// * `Ok(Frontier)` - Ready to run
    /// * `Err(RankerError)` - The start URL has no usable site mask
    pub fn new(
        start_url: &str,
        page_limit: usize,
        config: &CrawlerConfig,
        policy: &RetryPolicy,
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Result<Self> {
        let mask = site_mask(start_url)?;
        let start_url = normalize_url(start_url, &mask)?;
        let scheduler = Scheduler::new(config);

        let context = TaskContext {
            fetcher,
            extractor,
            mask,
            policy: policy.clone(),
            page_limit,
            min_interval: scheduler.min_interval(),
        };

        Ok(Self {
            state: CrawlState::new(start_url.clone()).into_shared(),
            start_url,
            context: Arc::new(context),
            scheduler,
            phase: FrontierPhase::Idle,
            stats: CrawlStatistics::default(),
        })
    }

    /// Runs waves until the page limit is reached or the crawl dead-ends
    ///
    /// Calling `run` again after it finished does nothing.
    pub async fn run(&mut self) {
        if self.phase.is_terminal() {
            return;
        }

        tracing::info!(
            "Starting crawl from {} (limit {} pages, {} workers)",
            self.start_url,
            self.context.page_limit,
            self.scheduler.workers()
        );
        let start_time = Instant::now();

        while let Some(wave) = self.next_wave() {
            self.phase = FrontierPhase::Expanding;
            self.stats.waves += 1;
            tracing::info!(
                "Wave {}: dispatching {} URLs",
                self.stats.waves,
                wave.len()
            );

            let mut tasks = JoinSet::new();
            for url in wave {
                let Some(scheduled) = self.scheduler.schedule(url).await else {
                    break;
                };
                let context = Arc::clone(&self.context);
                let state = Arc::clone(&self.state);
                tasks.spawn(async move {
                    let ScheduledFetch { url, _permit } = scheduled;
                    crawl_url(&context, &state, &url).await
                });
                self.stats.dispatched += 1;
            }

            self.phase = FrontierPhase::Draining;
            self.drain(&mut tasks, start_time).await;

            let (linked, pending) = {
                let state = lock_state(&self.state);
                (state.link_map().len(), state.pending_count())
            };
            tracing::info!(
                "Wave {} finished: {} pages linked, {} pending",
                self.stats.waves,
                linked,
                pending
            );
        }

        self.phase = FrontierPhase::Done;
        self.stats.elapsed = start_time.elapsed();

        let linked = lock_state(&self.state).link_map().len();
        if linked < self.context.page_limit {
            tracing::info!(
                "Crawl dead-ended with {} of {} pages",
                linked,
                self.context.page_limit
            );
        }
        tracing::info!(
            "Crawl complete: {} pages linked, {} fetched in {:.2}s",
            linked,
            self.stats.fetched,
            self.stats.elapsed.as_secs_f64()
        );
    }

    /// Takes the next wave, or `None` when the loop must stop
    fn next_wave(&mut self) -> Option<Vec<String>> {
        let mut state = lock_state(&self.state);
        if state.is_exhausted(self.context.page_limit) {
            return None;
        }

        let skipped_before = state.skipped_count();
        let wave = state.take_wave(self.context.page_limit);
        self.stats.duplicates += (state.skipped_count() - skipped_before) as u64;

        if wave.is_empty() {
            None
        } else {
            Some(wave)
        }
    }

    /// Waits for every task of the current wave, reporting progress
    async fn drain(&mut self, tasks: &mut JoinSet<UrlOutcome>, start_time: Instant) {
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => self.stats.record(outcome),
                Err(e) => {
                    tracing::error!("Crawl task aborted: {}", e);
                    self.stats.failed += 1;
                }
            }

            let completed = self.stats.completed();
            if completed % PROGRESS_INTERVAL == 0 {
                let elapsed = start_time.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 {
                    self.stats.fetched as f64 / elapsed
                } else {
                    0.0
                };
                tracing::info!(
                    "Progress: {} pages crawled, {} tasks in flight, {:.2} pages/sec",
                    self.stats.fetched,
                    tasks.len(),
                    rate
                );
            }
        }
    }

    pub fn phase(&self) -> FrontierPhase {
        self.phase
    }

    pub fn stats(&self) -> &CrawlStatistics {
        &self.stats
    }

    /// The canonical start URL
    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    /// Snapshot of the link map accumulated so far
    pub fn link_map(&self) -> LinkMap {
        lock_state(&self.state).link_map().clone()
    }

    /// Consumes the frontier, returning its link map
    pub fn into_link_map(self) -> LinkMap {
        match Arc::try_unwrap(self.state) {
            Ok(state) => state
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner)
                .into_link_map(),
            Err(shared) => lock_state(&shared).link_map().clone(),
        }
    }
}

/// Crawls a single URL: claim, fetch, extract, normalize, record
async fn crawl_url(context: &TaskContext, state: &SharedCrawlState, url: &str) -> UrlOutcome {
    let claimed = lock_state(state).claim(url);
    if !claimed {
        tracing::trace!("Skipping already visited {}", url);
        return UrlOutcome::Duplicate;
    }

    let started = Instant::now();
    let outcome = match fetch_with_retry(context.fetcher.as_ref(), url, &context.policy).await {
        FetchResult::Found { body } => {
            let raw = context.extractor.extract(&body);
            let links = normalize_links(&raw, &context.mask);

            if links.is_empty() {
                tracing::debug!("Dead end: {}", url);
                UrlOutcome::DeadEnd
            } else {
                let count = links.len();
                let recorded = lock_state(state).record_links(url, links, context.page_limit);
                if recorded {
                    tracing::debug!("Recorded {} links from {}", count, url);
                    UrlOutcome::Linked
                } else {
                    tracing::debug!("Page limit reached, dropping links of {}", url);
                    UrlOutcome::LimitReached
                }
            }
        }
        FetchResult::NotFound => {
            tracing::debug!("Not found: {}", url);
            UrlOutcome::NotFound
        }
        FetchResult::Failed { .. } => UrlOutcome::Failed,
    };

    pace(started, context.min_interval).await;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::parser::ArticleLinkExtractor;
    use crate::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const SITE: &str = "https://wiki.test";

    /// Serves canned pages and records every request
    #[derive(Default)]
    struct SiteFetcher {
        pages: HashMap<String, FetchResult>,
        requests: Mutex<Vec<String>>,
    }

    impl SiteFetcher {
        fn page(mut self, title: &str, links: &[&str]) -> Self {
            let body: String = links
                .iter()
                .map(|link| format!(r#"<a href="/wiki/{}">{}</a>"#, link, link))
                .collect();
            self.pages.insert(
                url(title),
                FetchResult::Found {
                    body: format!("<html><body>{}</body></html>", body),
                },
            );
            self
        }

        fn respond(mut self, title: &str, result: FetchResult) -> Self {
            self.pages.insert(url(title), result);
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for SiteFetcher {
        async fn fetch(&self, url: &str) -> FetchResult {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .unwrap_or(FetchResult::NotFound)
        }
    }

    fn url(title: &str) -> String {
        format!("{}/wiki/{}", SITE, title)
    }

    fn test_config(max_workers: usize) -> CrawlerConfig {
        CrawlerConfig {
            max_workers,
            min_request_interval: 0,
            ..CrawlerConfig::default()
        }
    }

    fn no_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 1,
            delay: Duration::ZERO,
            backoff: 1.0,
        }
    }

    fn frontier(fetcher: Arc<SiteFetcher>, page_limit: usize) -> Frontier {
        Frontier::new(
            &url("Start"),
            page_limit,
            &test_config(4),
            &no_retry(),
            fetcher,
            Arc::new(ArticleLinkExtractor::default()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_limit_one_halts_after_first_wave() {
        let fetcher = Arc::new(SiteFetcher::default().page("Start", &["A", "B"]).page("A", &["B"]));
        let mut frontier = frontier(Arc::clone(&fetcher), 1);

        frontier.run().await;

        let links = frontier.link_map();
        assert_eq!(links.len(), 1);
        assert_eq!(links[&url("Start")], vec![url("A"), url("B")]);
        assert_eq!(fetcher.requests(), vec![url("Start")]);
        assert_eq!(frontier.stats().waves, 1);
        assert_eq!(frontier.phase(), FrontierPhase::Done);
    }

    #[tokio::test]
    async fn test_not_found_is_not_a_key_and_wave_continues() {
        let fetcher = Arc::new(
            SiteFetcher::default()
                .page("Start", &["Missing", "A"])
                .page("A", &["Start"]),
        );
        let mut frontier = frontier(Arc::clone(&fetcher), 10);

        frontier.run().await;

        let links = frontier.link_map();
        assert!(!links.contains_key(&url("Missing")));
        assert!(links.contains_key(&url("A")));
        assert_eq!(frontier.stats().not_found, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_isolated() {
        let failure = FetchResult::Failed {
            error: FetchError::Status {
                url: url("Broken"),
                status: 500,
            },
        };
        let fetcher = Arc::new(
            SiteFetcher::default()
                .page("Start", &["Broken", "A"])
                .respond("Broken", failure)
                .page("A", &[]),
        );
        let mut frontier = frontier(Arc::clone(&fetcher), 10);

        frontier.run().await;

        assert_eq!(frontier.stats().failed, 1);
        assert_eq!(frontier.link_map().len(), 1);
        assert_eq!(frontier.stats().dead_ends, 1);
    }

    #[tokio::test]
    async fn test_no_url_fetched_twice() {
        let fetcher = Arc::new(
            SiteFetcher::default()
                .page("Start", &["A", "B", "A"])
                .page("A", &["B", "Start", "C"])
                .page("B", &["A", "C", "C"])
                .page("C", &["Start", "A"]),
        );
        let mut frontier = frontier(Arc::clone(&fetcher), 100);

        frontier.run().await;

        let mut requests = fetcher.requests();
        let total = requests.len();
        requests.sort();
        requests.dedup();
        assert_eq!(requests.len(), total);
        assert_eq!(frontier.link_map().len(), 4);
        assert!(frontier.stats().duplicates > 0);
    }

    #[tokio::test]
    async fn test_visited_links_do_not_take_wave_slots() {
        let fetcher = Arc::new(
            SiteFetcher::default()
                .page("Start", &["Start", "A", "Start", "A", "B"])
                .page("A", &["Start"])
                .page("B", &["A"]),
        );
        let mut frontier = frontier(Arc::clone(&fetcher), 3);

        frontier.run().await;

        assert_eq!(frontier.link_map().len(), 3);
        assert_eq!(frontier.stats().waves, 2);
        assert_eq!(frontier.stats().dispatched, 3);
        assert_eq!(fetcher.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_link_map_never_exceeds_limit() {
        let mut site = SiteFetcher::default();
        let hub: Vec<String> = (0..30).map(|i| format!("P{}", i)).collect();
        let hub_refs: Vec<&str> = hub.iter().map(String::as_str).collect();
        site = site.page("Start", &hub_refs);
        for title in &hub {
            site = site.page(title, &hub_refs);
        }

        for limit in [1, 2, 5, 17] {
            let fetcher = Arc::new(SiteFetcher {
                pages: site.pages.clone(),
                ..SiteFetcher::default()
            });
            let mut frontier = frontier(fetcher, limit);
            frontier.run().await;
            assert_eq!(frontier.link_map().len(), limit);
        }
    }

    #[tokio::test]
    async fn test_dead_end_stops_early() {
        let fetcher = Arc::new(SiteFetcher::default().page("Start", &["A"]).page("A", &[]));
        let mut frontier = frontier(Arc::clone(&fetcher), 50);

        frontier.run().await;

        assert_eq!(frontier.phase(), FrontierPhase::Done);
        assert_eq!(frontier.link_map().len(), 1);
        assert_eq!(frontier.stats().waves, 2);
        assert_eq!(frontier.stats().dead_ends, 1);
    }

    #[tokio::test]
    async fn test_start_url_is_canonicalized() {
        let fetcher = Arc::new(SiteFetcher::default().page("Grand_Theory", &["Grand Theory"]));
        let mut frontier = Frontier::new(
            &format!("{}/wiki/Grand%20Theory#Top", SITE),
            10,
            &test_config(2),
            &no_retry(),
            fetcher.clone(),
            Arc::new(ArticleLinkExtractor::default()),
        )
        .unwrap();

        assert_eq!(frontier.start_url(), url("Grand_Theory"));
        frontier.run().await;
        assert_eq!(fetcher.requests(), vec![url("Grand_Theory")]);
    }

    #[tokio::test]
    async fn test_second_run_is_noop() {
        let fetcher = Arc::new(SiteFetcher::default().page("Start", &["A"]));
        let mut frontier = frontier(Arc::clone(&fetcher), 1);

        frontier.run().await;
        frontier.run().await;

        assert_eq!(fetcher.requests().len(), 1);
        assert_eq!(frontier.into_link_map().len(), 1);
    }

    #[test]
    fn test_invalid_start_url_rejected() {
        let result = Frontier::new(
            "not a url",
            10,
            &test_config(1),
            &no_retry(),
            Arc::new(SiteFetcher::default()),
            Arc::new(ArticleLinkExtractor::default()),
        );
        assert!(result.is_err());
    }
}
