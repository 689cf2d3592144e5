//! Shared crawl state
//!
//! The visited set, the link map and the pending pool are written by every
//! task of a wave, so they live behind one mutex. Claiming a URL is a single
//! critical section, and so is recording a page's links together with
//! queueing them for the next wave.

use crate::graph::LinkMap;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Containers shared by all tasks of a crawl
#[derive(Debug, Default)]
pub struct CrawlState {
    /// URLs already dispatched for fetching
    visited: HashSet<String>,

    /// Page -> outbound links, in discovery order
    link_map: LinkMap,

    /// URLs waiting for the next wave
    pending: VecDeque<String>,

    /// Pending entries dropped because they were already claimed or queued
    skipped: usize,
}

/// Handle to the crawl state shared between wave tasks
pub type SharedCrawlState = Arc<Mutex<CrawlState>>;

impl CrawlState {
    /// Creates the initial state: nothing visited, only the start URL pending
    pub fn new(start_url: impl Into<String>) -> Self {
        let mut pending = VecDeque::new();
        pending.push_back(start_url.into());

        Self {
            visited: HashSet::new(),
            link_map: LinkMap::new(),
            pending,
            skipped: 0,
        }
    }

    /// Wraps the state for sharing across tasks
    pub fn into_shared(self) -> SharedCrawlState {
        Arc::new(Mutex::new(self))
    }

    /// Marks a URL visited; returns false if it was already claimed
    pub fn claim(&mut self, url: &str) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.to_string())
    }

    /// Removes the next wave from the front of the pending pool
    ///
    /// The wave is sized to the remaining need (`page_limit - |link map|`);
    /// anything beyond it stays pending for a later wave. Entries already
    /// visited, or already in this wave, are dropped on the way and do not
    /// take a slot. An empty wave means the pending pool is exhausted.
    pub fn take_wave(&mut self, page_limit: usize) -> Vec<String> {
        let need = self.remaining(page_limit);
        let mut wave = Vec::with_capacity(need.min(self.pending.len()));
        let mut queued = HashSet::new();

        while wave.len() < need {
            let Some(url) = self.pending.pop_front() else {
                break;
            };
            if self.visited.contains(&url) || !queued.insert(url.clone()) {
                self.skipped += 1;
                continue;
            }
            wave.push(url);
        }

        wave
    }

    /// Records a page's links and queues them, unless the limit was hit
    ///
    /// Returns false (and changes nothing) when the link map is already full.
    pub fn record_links(&mut self, url: &str, links: Vec<String>, page_limit: usize) -> bool {
        if self.link_map.len() >= page_limit {
            return false;
        }

        self.pending.extend(links.iter().cloned());
        self.link_map.insert(url.to_string(), links);
        true
    }

    /// Number of link-map entries still allowed under the limit
    pub fn remaining(&self, page_limit: usize) -> usize {
        page_limit.saturating_sub(self.link_map.len())
    }

    /// Returns true when the crawl loop must stop
    pub fn is_exhausted(&self, page_limit: usize) -> bool {
        self.remaining(page_limit) == 0 || self.pending.is_empty()
    }

    pub fn link_map(&self) -> &LinkMap {
        &self.link_map
    }

    pub fn into_link_map(self) -> LinkMap {
        self.link_map
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped
    }
}

/// Locks the shared state, recovering the data if a task panicked while
/// holding the lock
///
/// Every mutation is a single insert or extend, so the containers are
/// consistent even after a poisoning panic.
pub fn lock_state(state: &Mutex<CrawlState>) -> MutexGuard<'_, CrawlState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
