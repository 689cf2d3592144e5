//! Deep merge of partial inverted maps
//!
//! Pooled inverters produce one partial map per source page. Partials are
//! JSON objects so they can cross a process boundary unchanged; merging them
//! concatenates list values for colliding keys and refuses to combine values
//! of different shapes.

use crate::graph::InvertedMap;
use serde_json::map::Entry;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// A partial inverted map: target URL -> list of referring pages
pub type PartialMap = serde_json::Map<String, Value>;

/// Errors raised while merging partial results
///
/// These never occur for partials built by [`invert_entry`]; they signal a
/// worker that returned data of the wrong shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("Types of values for key {key} do not match in merged maps: {expected} vs {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Value for key {key} is a {found}, expected a list of URLs")]
    Shape { key: String, found: &'static str },
}

/// Merges `other` into `base`
///
/// - keys missing from `base` are inserted
/// - colliding lists are concatenated, `base` items first
/// - colliding maps are merged recursively
/// - colliding scalars of the same kind are replaced
/// - colliding values of different kinds raise [`MergeError::TypeMismatch`]
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use wiki_ranker::graph::{merge_partial, PartialMap};
///
/// let mut base: PartialMap = json!({"a": [1, 2]}).as_object().unwrap().clone();
/// let other: PartialMap = json!({"a": [3]}).as_object().unwrap().clone();
/// merge_partial(&mut base, other).unwrap();
/// assert_eq!(base["a"], json!([1, 2, 3]));
/// ```
pub fn merge_partial(base: &mut PartialMap, other: PartialMap) -> Result<(), MergeError> {
    for (key, value) in other {
        match base.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => {
                let expected = kind_of(slot.get());
                let found = kind_of(&value);
                if expected != found {
                    return Err(MergeError::TypeMismatch {
                        key: slot.key().clone(),
                        expected,
                        found,
                    });
                }

                match (slot.get_mut(), value) {
                    (Value::Array(items), Value::Array(more)) => items.extend(more),
                    (Value::Object(inner), Value::Object(more)) => merge_partial(inner, more)?,
                    (existing, value) => *existing = value,
                }
            }
        }
    }

    Ok(())
}

/// Inverts a single link-map entry into a partial map
///
/// Each distinct target of `source` maps to `[source]`; a page that links
/// the same target twice still counts as one referral.
pub fn invert_entry(source: &str, targets: &[String]) -> PartialMap {
    let mut partial = PartialMap::new();
    for target in targets {
        if let Entry::Vacant(slot) = partial.entry(target.as_str()) {
            slot.insert(Value::Array(vec![Value::String(source.to_string())]));
        }
    }
    partial
}

/// Converts a fully merged partial map into an [`InvertedMap`]
///
/// Every value must be a list of strings.
pub fn into_inverted(partial: PartialMap) -> Result<InvertedMap, MergeError> {
    let mut inverted = InvertedMap::with_capacity(partial.len());

    for (key, value) in partial {
        let Value::Array(items) = value else {
            return Err(MergeError::Shape {
                found: kind_of(&value),
                key,
            });
        };

        let mut sources = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::String(source) => sources.push(source),
                other => {
                    return Err(MergeError::Shape {
                        key,
                        found: kind_of(&other),
                    })
                }
            }
        }
        inverted.insert(key, sources);
    }

    Ok(inverted)
}

/// Distinct targets of a page in discovery order
pub(crate) fn distinct_targets(targets: &[String]) -> impl Iterator<Item = &String> {
    let mut seen = HashSet::new();
    targets.iter().filter(move |target| seen.insert(*target))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
