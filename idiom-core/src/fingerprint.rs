//! Fingerprint derivation.
//!
//! The fingerprint is the sole identity and equality mechanism across the
//! cache, the seen-set and favorites. It is recomputed from record text on
//! demand and never stored as a separate entity; the seen-set and favorites
//! persist fingerprint *strings*, not fingerprint objects.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized identity key for an idiom.
///
/// Derived as the lowercased, whitespace-stripped concatenation of the
/// language code and the idiom text. Both inputs must be non-empty; records
/// are validated at the generation boundary before they reach this point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Derive the fingerprint for a language code + idiom text pair.
    pub fn of(language_code: &str, idiom: &str) -> Self {
        let mut key = String::with_capacity(language_code.len() + idiom.len());
        key.extend(language_code.chars().filter(|c| !c.is_whitespace()).flat_map(char::to_lowercase));
        key.extend(idiom.chars().filter(|c| !c.is_whitespace()).flat_map(char::to_lowercase));
        Self(key)
    }

    /// Wrap an already-derived fingerprint string (from persisted state).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The underlying key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Fingerprint> for String {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}
