//! Wiki-Ranker: a bounded-concurrency link-graph crawler
//!
//! This crate crawls a site breadth-first up to a page limit, records the
//! outbound article links of every page it visits, then inverts that link
//! graph to rank pages by the number of pages linking to them.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Wiki-Ranker operations
#[derive(Debug, Error)]
pub enum RankerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Inversion error: {0}")]
    Invert(#[from] graph::InvertError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// Every variant is fatal at startup and never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Transient fetch errors, retried by the fetch policy
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request timeout for {url}")]
    Timeout { url: String },

    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },
}

/// Result type alias for Wiki-Ranker operations
pub type Result<T> = std::result::Result<T, RankerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run, Frontier};
pub use graph::{count_rank, InvertedMap, Inverter, InverterStrategy, LinkMap, RankMap};
pub use state::{FrontierPhase, UrlOutcome};
pub use url::{normalize_links, site_mask};
