//! Rotation cache.
//!
//! Bounded FIFO buffer of previously generated idioms. Append-only in
//! steady state; when capacity is exceeded the oldest entries are evicted.
//! The cache is persisted verbatim and reloaded at startup, so its order is
//! part of the durable state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::seen::SeenSet;
use crate::types::IdiomRecord;

/// Default capacity of the generative-mode cache.
pub const DEFAULT_CAPACITY: usize = 100;

/// Capacity-bounded, insertion-ordered buffer of idiom records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationCache {
    entries: Vec<IdiomRecord>,
    #[serde(skip, default = "default_capacity")]
    capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for RotationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RotationCache {
    /// Create an empty cache with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Rebuild a cache from persisted entries, trimming to capacity.
    pub fn from_entries(entries: Vec<IdiomRecord>, capacity: usize) -> Self {
        let mut cache = Self { entries, capacity };
        cache.trim();
        cache
    }

    /// Append a record, evicting oldest entries if capacity is exceeded.
    pub fn push(&mut self, record: IdiomRecord) {
        self.entries.push(record);
        self.trim();
    }

    fn trim(&mut self) {
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
            debug!(evicted = excess, len = self.entries.len(), "Rotation cache trimmed");
        }
    }

    /// Records whose fingerprint is not in the given seen-set, oldest first.
    pub fn unseen<'a>(&'a self, seen: &SeenSet) -> Vec<&'a IdiomRecord> {
        self.entries
            .iter()
            .filter(|r| !seen.contains(&r.fingerprint()))
            .collect()
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over cached records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &IdiomRecord> {
        self.entries.iter()
    }

    /// The cached records, oldest first, for persistence.
    pub fn entries(&self) -> &[IdiomRecord] {
        &self.entries
    }
}
