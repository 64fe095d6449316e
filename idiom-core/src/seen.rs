//! Seen-set tracking.
//!
//! Fingerprints shown to the user since the last full-rotation reset. The
//! set is cleared wholesale once it covers the entire cache, which starts a
//! new rotation. Persisted as a plain sequence of fingerprint strings.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;

/// Set of fingerprints already shown in the current rotation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenSet {
    // BTreeSet keeps the persisted sequence deterministic
    shown: BTreeSet<Fingerprint>,
}

impl SeenSet {
    /// Rebuild from persisted fingerprint strings.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            shown: raw.into_iter().map(|s| Fingerprint::from_raw(s)).collect(),
        }
    }

    /// Mark a fingerprint as shown. Returns false if it was already marked.
    pub fn insert(&mut self, fingerprint: Fingerprint) -> bool {
        self.shown.insert(fingerprint)
    }

    /// Whether a fingerprint has been shown this rotation.
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.shown.contains(fingerprint)
    }

    /// Number of fingerprints shown this rotation.
    pub fn len(&self) -> usize {
        self.shown.len()
    }

    /// Whether nothing has been shown this rotation.
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    /// Whether every one of `pool_size` records has been shown.
    ///
    /// The reset policy compares the seen-set size against the cache size at
    /// the time of the check, so a trimmed cache can make this true early.
    pub fn covers(&self, pool_size: usize) -> bool {
        self.shown.len() >= pool_size
    }

    /// Begin a new rotation.
    pub fn clear(&mut self) {
        self.shown.clear();
    }

    /// Fingerprint strings for persistence, in deterministic order.
    pub fn to_raw(&self) -> Vec<String> {
        self.shown.iter().map(|fp| fp.as_str().to_string()).collect()
    }
}
