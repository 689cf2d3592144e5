//! Crawl statistics
//!
//! Counters are updated by the frontier as wave tasks complete and printed
//! once the crawl is done.

use crate::state::UrlOutcome;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// Number of waves dispatched
    pub waves: u64,

    /// URLs handed to a crawl task
    pub dispatched: u64,

    /// Tasks that performed a real fetch
    pub fetched: u64,

    /// Pages whose links were written to the link map
    pub linked: u64,

    /// Pages answered with 404
    pub not_found: u64,

    /// Pages fetched without any article link
    pub dead_ends: u64,

    /// Pending URLs skipped because they were already claimed or queued
    pub duplicates: u64,

    /// Pages fetched after the link map was already full
    pub limit_reached: u64,

    /// Pages that failed after every retry, or whose task aborted
    pub failed: u64,

    /// Wall-clock time of the crawl
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Accounts for one completed task
    pub fn record(&mut self, outcome: UrlOutcome) {
        if outcome.was_fetched() {
            self.fetched += 1;
        }

        match outcome {
            UrlOutcome::Linked => self.linked += 1,
            UrlOutcome::DeadEnd => self.dead_ends += 1,
            UrlOutcome::NotFound => self.not_found += 1,
            UrlOutcome::Duplicate => self.duplicates += 1,
            UrlOutcome::LimitReached => self.limit_reached += 1,
            UrlOutcome::Failed => self.failed += 1,
        }
    }

    /// Tasks that have finished, whatever their outcome
    pub fn completed(&self) -> u64 {
        self.linked
            + self.dead_ends
            + self.not_found
            + self.duplicates
            + self.limit_reached
            + self.failed
    }

    /// Fetches per second over the whole crawl
    pub fn pages_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.fetched as f64 / secs
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Waves: {}", stats.waves);
    println!("  URLs dispatched: {}", stats.dispatched);
    println!("  Pages fetched: {}", stats.fetched);
    println!(
        "  Elapsed: {:.2}s ({:.2} pages/sec)",
        stats.elapsed.as_secs_f64(),
        stats.pages_per_sec()
    );
    println!();

    println!("Outcomes:");
    let outcomes = [
        (UrlOutcome::Linked, stats.linked),
        (UrlOutcome::DeadEnd, stats.dead_ends),
        (UrlOutcome::NotFound, stats.not_found),
        (UrlOutcome::Duplicate, stats.duplicates),
        (UrlOutcome::LimitReached, stats.limit_reached),
        (UrlOutcome::Failed, stats.failed),
    ];
    let total = stats.completed();
    for (outcome, count) in outcomes {
        if count == 0 {
            continue;
        }
        let percentage = if total > 0 {
            (count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", outcome, count, percentage);
    }
    println!();
}
