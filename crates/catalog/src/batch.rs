//! Result reassembly: folding flat row sequences into per-key groupings.

use std::collections::HashMap;
use std::hash::Hash;

/// Order-preserving multi-map with an optional per-key capacity.
///
/// Values are appended in first-seen order. Once a key holds `limit` values,
/// further pushes for that key are skipped, not errored; with dedup enabled,
/// a value already present under the key is skipped before the capacity
/// check, so truncation happens after deduplication.
#[derive(Debug, Clone)]
pub struct Grouped<K, V> {
    entries: HashMap<K, Vec<V>>,
    limit: Option<usize>,
    dedup: bool,
}

impl<K, V> Default for Grouped<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            limit: None,
            dedup: false,
        }
    }
}

impl<K, V> Grouped<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn dedup(mut self) -> Self {
        self.dedup = true;
        self
    }

    pub fn push(&mut self, key: K, value: V) {
        let sequence = self.entries.entry(key).or_default();
        if self.dedup && sequence.contains(&value) {
            return;
        }
        if let Some(limit) = self.limit {
            if sequence.len() >= limit {
                return;
            }
        }
        sequence.push(value);
    }

    /// Finish the fold. Keys that never accepted a value are absent.
    pub fn into_map(self) -> HashMap<K, Vec<V>> {
        self.entries
            .into_iter()
            .filter(|(_, sequence)| !sequence.is_empty())
            .collect()
    }
}
