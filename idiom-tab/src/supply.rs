//! Supply-mode strategy.
//!
//! Two alternate idiom sources exist: the bundled static dataset and the
//! generative rotation cache. Both sit behind [`IdiomSupply`], chosen once
//! at startup by configuration; the session engine is oblivious to which
//! one is driving.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use idiom_core::{Dataset, IdiomRecord};

use crate::session::SessionState;

/// Result of one supply attempt.
#[derive(Debug)]
pub enum SupplyOutcome {
    /// A record to display
    Idiom(IdiomRecord),
    /// Nothing could be produced; prior display state must stay untouched
    Unavailable {
        /// Short user-facing notice text
        notice: String,
    },
}

/// Strategy trait over the two supply variants.
#[async_trait]
pub trait IdiomSupply: Send + Sync {
    /// Produce the next idiom to display.
    ///
    /// Implementations may mutate the seen-set (rotation resets) and the
    /// cache (generative appends); marking the returned record as seen and
    /// persisting are the caller's job.
    async fn next(&self, state: &mut SessionState) -> SupplyOutcome;
}

/// Static supply: uniform random choice over the bundled dataset.
///
/// When every dataset record has been shown the seen-set clears and the
/// full pool becomes eligible again immediately - unlike generative mode
/// there is no generation step to fall through to.
pub struct DatasetSupply {
    dataset: Dataset,
}

impl DatasetSupply {
    /// Create a supply over a loaded dataset.
    pub fn new(dataset: Dataset) -> Self {
        info!(records = dataset.len(), "Static idiom supply ready");
        Self { dataset }
    }
}

#[async_trait]
impl IdiomSupply for DatasetSupply {
    async fn next(&self, state: &mut SessionState) -> SupplyOutcome {
        if self.dataset.is_empty() {
            return SupplyOutcome::Unavailable {
                notice: "No idioms available".to_string(),
            };
        }

        let unseen: Vec<&IdiomRecord> = self
            .dataset
            .records()
            .iter()
            .filter(|r| !state.seen.contains(&r.fingerprint()))
            .collect();

        let pick = if unseen.is_empty() {
            debug!(pool = self.dataset.len(), "Dataset rotation complete, resetting seen set");
            state.seen.clear();
            self.dataset.records().choose(&mut rand::thread_rng())
        } else {
            unseen.choose(&mut rand::thread_rng()).copied()
        };

        match pick {
            Some(record) => SupplyOutcome::Idiom(record.clone()),
            None => SupplyOutcome::Unavailable {
                notice: "No idioms available".to_string(),
            },
        }
    }
}
