use crate::graph::merge::{into_inverted, invert_entry, merge_partial, PartialMap};
use crate::graph::{InvertError, InvertedMap, Inverter, LinkMap};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

/// Inverts one link-map entry per task on a bounded thread pool
///
/// Each task builds a local partial map; partials are folded together with
/// [`merge_partial`], so a shape mismatch aborts the whole inversion.
#[derive(Debug, Clone)]
pub struct ThreadedInverter {
    max_workers: usize,
}

impl ThreadedInverter {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }
}

impl Inverter for ThreadedInverter {
    fn name(&self) -> &'static str {
        "threaded"
    }

    fn invert(&self, links: &LinkMap) -> Result<InvertedMap, InvertError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .thread_name(|index| format!("invert-{}", index))
            .build()?;

        let merged = pool.install(|| {
            links
                .par_iter()
                .map(|(source, targets)| invert_entry(source, targets))
                .try_fold(PartialMap::new, |mut acc, partial| {
                    merge_partial(&mut acc, partial)?;
                    Ok::<_, InvertError>(acc)
                })
                .try_reduce(PartialMap::new, |mut left, right| {
                    merge_partial(&mut left, right)?;
                    Ok(left)
                })
        })?;

        Ok(into_inverted(merged)?)
    }
}
