/// Phase and outcome definitions for tracking crawl progress
///
/// This module defines the states of the frontier accumulator and the
/// possible outcomes of a single dispatched URL.
use std::fmt;

/// Lifecycle of a frontier accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontierPhase {
    /// Constructed; only the start URL is pending
    Idle,

    /// Dispatching the current wave's fetch tasks
    Expanding,

    /// Waiting for every in-flight task of the current wave
    Draining,

    /// Page limit reached or frontier exhausted; the link map is frozen
    Done,
}

impl FrontierPhase {
    /// Returns true once the crawl can no longer change the link map
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true while a wave is in progress
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Expanding | Self::Draining)
    }

    /// Returns the string representation used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Expanding => "expanding",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for FrontierPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one dispatched URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlOutcome {
    /// Page fetched and its links written to the link map
    Linked,

    /// Page fetched but no content-namespace links were found
    DeadEnd,

    /// Server answered 404; no content at this URL
    NotFound,

    /// Another task already claimed this URL
    Duplicate,

    /// Page limit was reached before the links could be recorded
    LimitReached,

    /// Every fetch attempt failed
    Failed,
}

impl UrlOutcome {
    /// Returns true if a real fetch was performed for this URL
    pub fn was_fetched(&self) -> bool {
        !matches!(self, Self::Duplicate)
    }

    /// Returns true if the URL contributed an entry to the link map
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Linked)
    }

    /// Returns the string representation used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linked => "linked",
            Self::DeadEnd => "dead_end",
            Self::NotFound => "not_found",
            Self::Duplicate => "duplicate",
            Self::LimitReached => "limit_reached",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for UrlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
