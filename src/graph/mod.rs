//! Link graph inversion and ranking
//!
//! The crawl produces a forward [`LinkMap`] (page -> outbound links). This
//! module inverts it into an [`InvertedMap`] (target -> referring pages) and
//! reduces that to a [`RankMap`] of inbound-link counts.
//!
//! Three interchangeable [`Inverter`] strategies are offered:
//! - [`SequentialInverter`]: a plain fold, the correctness baseline
//! - [`ThreadedInverter`]: per-entry partials on a bounded thread pool
//! - [`ProcessInverter`]: per-entry partials computed by worker processes
//!
//! For the same link map all three yield the same inverted map, up to the
//! order of each value list.

mod merge;
mod process;
mod rank;
mod sequential;
mod threaded;

use crate::config::InverterConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use thiserror::Error;

pub use merge::{into_inverted, invert_entry, merge_partial, MergeError, PartialMap};
pub use process::{run_worker, ProcessInverter, WorkerRequest, WorkerResponse, WORKER_SUBCOMMAND};
pub use rank::{reduce, top_ranked};
pub use sequential::SequentialInverter;
pub use threaded::ThreadedInverter;

/// Page URL -> outbound links in discovery order
pub type LinkMap = HashMap<String, Vec<String>>;

/// Link target -> pages linking to it
pub type InvertedMap = HashMap<String, Vec<String>>;

/// URL -> number of pages linking to it
pub type RankMap = HashMap<String, usize>;

/// Errors that abort an inversion call
#[derive(Debug, Error)]
pub enum InvertError {
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    #[error("Failed to build thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("Worker process failed: {0}")]
    Worker(String),

    #[error("Worker protocol error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A strategy for inverting a link map
pub trait Inverter: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Builds the inverted map; `result[t]` lists every page linking to `t`
    fn invert(&self, links: &LinkMap) -> Result<InvertedMap, InvertError>;
}

/// Selectable inversion strategies
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum InverterStrategy {
    Sequential,
    #[default]
    Threaded,
    Process,
}

impl InverterStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Threaded => "threaded",
            Self::Process => "process",
        }
    }
}

impl std::fmt::Display for InverterStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the inverter for a strategy, sized by the inverter configuration
pub fn build_inverter(
    strategy: InverterStrategy,
    config: &InverterConfig,
) -> Result<Box<dyn Inverter>, InvertError> {
    Ok(match strategy {
        InverterStrategy::Sequential => Box::new(SequentialInverter),
        InverterStrategy::Threaded => Box::new(ThreadedInverter::new(config.threads)),
        InverterStrategy::Process => Box::new(ProcessInverter::from_current_exe(config.processes)?),
    })
}

/// Inverts the link map with `inverter` and reduces it to ranks
pub fn count_rank(links: &LinkMap, inverter: &dyn Inverter) -> Result<RankMap, InvertError> {
    let started = Instant::now();
    let inverted = inverter.invert(links)?;
    tracing::info!(
        "Inverted {} pages into {} targets with the {} strategy in {:?}",
        links.len(),
        inverted.len(),
        inverter.name(),
        started.elapsed()
    );
    Ok(reduce(&inverted))
}
