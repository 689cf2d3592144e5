//! Configuration module for Wiki-Ranker
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file (or no file at all) is a valid
//! configuration as long as the start URL is supplied elsewhere.
//!
//! # Example
//!
//! ```no_run
//! use wiki_ranker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ranker.toml")).unwrap();
//! println!("Crawling at most {} pages", config.crawler.page_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, InverterConfig, RetryConfig, UserAgentConfig, MAX_REQUEST_TIMEOUT_SECS,
    MAX_RETRY_DELAY,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_start_url};
