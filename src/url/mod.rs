//! URL handling module for Wiki-Ranker
//!
//! This module resolves the site mask of a crawl and turns extracted links
//! into absolute, canonical URLs that can be used as graph keys.

mod mask;
mod normalize;

// Re-export main functions
pub use mask::site_mask;
pub use normalize::{normalize_links, normalize_url};
