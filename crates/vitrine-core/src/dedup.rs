//! Order-preserving deduplication.
//!
//! The remote API is known to return the same entity more than once, both in
//! id listings and in item batches. Both helpers keep the first occurrence of
//! each key and drop later repeats in a single pass.

use std::collections::HashSet;
use std::hash::Hash;

/// Entities with a stable string identity.
pub trait HasId {
    fn id(&self) -> &str;
}

/// Returns one item per distinct id, in order of first occurrence.
#[must_use]
pub fn dedupe_by_id<T: HasId>(items: Vec<T>) -> Vec<T> {
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.id().to_owned()))
        .collect()
}

/// Returns each distinct value once, in order of first occurrence.
#[must_use]
pub fn dedupe_values<T: Eq + Hash + Clone>(values: Vec<T>) -> Vec<T> {
    let mut seen: HashSet<T> = HashSet::with_capacity(values.len());
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
