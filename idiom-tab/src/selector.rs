//! Generative supply: the rotation selector.
//!
//! Serves unseen cached idioms first, clears the seen-set once a rotation
//! completes, and only then spends a generation call. Guarantees eventual
//! full coverage of the cache with no immediate repeats, while keeping
//! external calls to the minimum the cache allows.

use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use idiom_agent::{random_language, IdiomGenerator};

use crate::session::SessionState;
use crate::supply::{IdiomSupply, SupplyOutcome};

/// Generative supply over the rotation cache and a generator backend.
pub struct GenerativeSupply {
    generator: Arc<dyn IdiomGenerator>,
}

impl GenerativeSupply {
    /// Create a supply backed by the given generator.
    pub fn new(generator: Arc<dyn IdiomGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl IdiomSupply for GenerativeSupply {
    /// Selection algorithm, in priority order:
    ///
    /// 1. serve an unseen cached idiom, chosen uniformly at random - no
    ///    network call;
    /// 2. if every cached idiom has been shown, clear the seen-set to begin
    ///    a new rotation, but do NOT serve from cache this cycle;
    /// 3. ask the generator for a novel record, append it to the cache
    ///    (evicting oldest entries past capacity) and return it;
    /// 4. on any generation failure, report "no idiom available" - the
    ///    failure is terminal for this attempt, nothing is retried.
    async fn next(&self, state: &mut SessionState) -> SupplyOutcome {
        let pick = state
            .cache
            .unseen(&state.seen)
            .choose(&mut rand::thread_rng())
            .map(|r| (*r).clone());

        if let Some(record) = pick {
            debug!(
                fingerprint = %record.fingerprint(),
                cached = state.cache.len(),
                seen = state.seen.len(),
                "Serving unseen idiom from cache"
            );
            return SupplyOutcome::Idiom(record);
        }

        if !state.cache.is_empty() && state.seen.covers(state.cache.len()) {
            info!(cached = state.cache.len(), "Rotation complete, starting a new one");
            state.seen.clear();
        }

        let language = random_language();
        match self.generator.generate(language).await {
            Ok(record) => {
                debug!(
                    fingerprint = %record.fingerprint(),
                    language = language.code,
                    "Appending generated idiom to cache"
                );
                state.cache.push(record.clone());
                SupplyOutcome::Idiom(record)
            }
            Err(e) => {
                warn!(language = language.code, error = %e, "Generation failed");
                SupplyOutcome::Unavailable { notice: e.notice() }
            }
        }
    }
}
