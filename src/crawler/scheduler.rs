//! Scheduler for bounding and pacing crawl tasks
//!
//! This module handles:
//! - Concurrency limiting of a wave's tasks via a semaphore
//! - Capping the worker count by the global request-rate ceiling
//! - Per-task pacing so no fetching task completes under the minimum interval

use crate::config::CrawlerConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A URL cleared for fetching, holding one worker slot
pub struct ScheduledFetch {
    /// The URL to fetch
    pub url: String,

    /// The semaphore permit for this fetch; the slot frees when dropped
    pub _permit: OwnedSemaphorePermit,
}

/// Scheduler hands out worker slots to wave tasks
///
/// The scheduler coordinates:
/// - Worker concurrency (`min(max_workers, max_request_rate)` slots)
/// - The pacing floor every fetching task must respect
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Semaphore limiting concurrent crawl tasks
    semaphore: Arc<Semaphore>,

    /// Number of worker slots
    workers: usize,

    /// Minimum wall-clock duration of a fetching task
    min_interval: Duration,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    pub fn new(config: &CrawlerConfig) -> Self {
        let workers = config.effective_workers().max(1);

        Self {
            semaphore: Arc::new(Semaphore::new(workers)),
            workers,
            min_interval: config.min_request_interval(),
        }
    }

    /// Waits for a free worker slot for `url`
    ///
    /// # Returns
    ///
    /// * `Some(ScheduledFetch)` - The URL with its permit
    /// * `None` - The scheduler was closed
    pub async fn schedule(&self, url: String) -> Option<ScheduledFetch> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await.ok()?;
        tracing::trace!("Scheduled {} ({} slots free)", url, self.available());

        Some(ScheduledFetch {
            url,
            _permit: permit,
        })
    }

    /// Number of worker slots
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Slots not currently held by a task
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Sleeps until at least `min_interval` has passed since `started`
pub async fn pace(started: Instant, min_interval: Duration) {
    let elapsed = started.elapsed();
    if let Some(remaining) = min_interval.checked_sub(elapsed) {
        if !remaining.is_zero() {
            tracing::trace!("Pacing task for {:?}", remaining);
            tokio::time::sleep(remaining).await;
        }
    }
}
