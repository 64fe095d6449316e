//! Idiom record type.
//!
//! Field names serialize in camelCase to match the persisted JSON schema
//! shared by the bundled dataset and generated records.

use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;

/// One foreign-language idiom with its English gloss and usage examples.
///
/// Immutable once created: records are either read from the bundled dataset
/// or produced by the generation client, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdiomRecord {
    /// Collision-tolerant identifier (dataset-assigned or synthesized)
    pub id: String,
    /// BCP-47-like language tag (e.g., "ja", "pt-BR")
    pub language_code: String,
    /// Display name of the language (e.g., "Japanese")
    pub language_name: String,
    /// The idiom in native script
    pub idiom: String,
    /// English gloss of the idiom's meaning
    pub meaning_en: String,
    /// Example sentence in the native language
    pub example_native: String,
    /// English translation of the example
    pub example_en: String,
    /// Romanization for non-Latin scripts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,
    /// Cultural or historical note on the idiom's origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl IdiomRecord {
    /// Derive the record's identity fingerprint.
    ///
    /// Two records with equal fingerprints are the same idiom for cache,
    /// seen-set and favorites purposes, regardless of their `id` fields.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.language_code, &self.idiom)
    }

    /// Whether the record carries the fields fingerprinting requires.
    pub fn is_fingerprintable(&self) -> bool {
        !self.language_code.trim().is_empty() && !self.idiom.trim().is_empty()
    }
}
