//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the visited set, link map and pending pool shared by a wave's tasks
//! - `FrontierPhase`: lifecycle of the frontier accumulator
//! - `UrlOutcome`: what happened to a single dispatched URL

mod crawl_state;
mod phase;

// Re-export main types
pub use crawl_state::{lock_state, CrawlState, SharedCrawlState};
pub use phase::{FrontierPhase, UrlOutcome};
