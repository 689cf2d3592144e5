//! Output module for crawl and ranking summaries
//!
//! This module handles:
//! - Printing crawl statistics
//! - Printing the highest-ranked pages
//! - Exporting the full rank map as JSON

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};

use crate::graph::{top_ranked, RankMap};
use std::collections::BTreeMap;
use std::io::Write;

/// Prints the `n` highest-ranked pages to stdout
///
/// # Arguments
///
/// * `ranks` - The rank map to summarize
/// * `n` - How many pages to show
pub fn print_top_ranked(ranks: &RankMap, n: usize) {
    println!("=== Top {} Pages by Inbound Links ===\n", n);

    if ranks.is_empty() {
        println!("  (no links recorded)");
        println!();
        return;
    }

    let top = top_ranked(ranks, n);
    let width = top.len().to_string().len();
    for (position, (url, rank)) in top.iter().enumerate() {
        println!("  {:>width$}. {} ({})", position + 1, url, rank, width = width);
    }
    println!();

    println!("Ranked pages: {}", ranks.len());
    println!();
}

/// Writes the full rank map as a JSON object with sorted keys
pub fn write_rank_json<W: Write>(ranks: &RankMap, mut writer: W) -> serde_json::Result<()> {
    let sorted: BTreeMap<&String, &usize> = ranks.iter().collect();
    serde_json::to_writer_pretty(&mut writer, &sorted)?;
    writeln!(writer).map_err(serde_json::Error::io)?;
    Ok(())
}
