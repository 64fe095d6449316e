//! Bundled static idiom dataset.
//!
//! The static supply mode draws from a fixed JSON array of idiom records
//! shipped with the binary, the same schema the generation client produces.

use thiserror::Error;
use tracing::warn;

use crate::types::IdiomRecord;

/// Errors loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset body is not a valid JSON array of idiom records
    #[error("Invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No usable records remained after validation
    #[error("Dataset contains no usable idiom records")]
    Empty,
}

/// Fixed pool of idiom records for static supply mode.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<IdiomRecord>,
}

impl Dataset {
    /// Load the dataset bundled with the crate.
    pub fn bundled() -> Result<Self, DatasetError> {
        Self::from_json(include_str!("../data/idioms.json"))
    }

    /// Parse a dataset from a JSON array of idiom records.
    ///
    /// Records that cannot be fingerprinted (empty language code or idiom
    /// text) are skipped rather than poisoning the whole pool.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let parsed: Vec<IdiomRecord> = serde_json::from_str(json)?;
        let total = parsed.len();
        let records: Vec<IdiomRecord> =
            parsed.into_iter().filter(|r| r.is_fingerprintable()).collect();

        if records.len() < total {
            warn!(
                skipped = total - records.len(),
                kept = records.len(),
                "Dataset contained records without language code or idiom text"
            );
        }
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self { records })
    }

    /// All records in dataset order.
    pub fn records(&self) -> &[IdiomRecord] {
        &self.records
    }

    /// Number of records in the pool.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the pool is empty (never true for a loaded dataset).
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
