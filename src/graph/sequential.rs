use crate::graph::merge::distinct_targets;
use crate::graph::{InvertError, InvertedMap, Inverter, LinkMap};

/// Single-threaded fold over the link map
///
/// Baseline the pooled strategies are checked against.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialInverter;

impl Inverter for SequentialInverter {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn invert(&self, links: &LinkMap) -> Result<InvertedMap, InvertError> {
        let mut inverted = InvertedMap::new();
        for (source, targets) in links {
            for target in distinct_targets(targets) {
                inverted
                    .entry(target.clone())
                    .or_default()
                    .push(source.clone());
            }
        }
        Ok(inverted)
    }
}
