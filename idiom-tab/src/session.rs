//! Session state and the session engine.
//!
//! All mutable state (cache, seen-set, favorites, current record) lives in
//! one explicit [`SessionState`] owned by the [`Session`]; the persistence
//! port is injected at construction. Keys are read once at load and the
//! whole state is rewritten on each mutation, matching the storage
//! contract of the original extension.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info};

use idiom_core::{Favorites, IdiomRecord, RotationCache, SeenSet};

use crate::store::{keys, StateStore, StoreError};
use crate::supply::{IdiomSupply, SupplyOutcome};

/// Outcome of one selection request.
#[derive(Debug)]
pub enum Selection {
    /// A record to render
    Idiom(IdiomRecord),
    /// No idiom could be produced; prior display state is untouched
    Unavailable {
        /// Short transient notice for the user
        notice: String,
    },
    /// A selection was already in flight; this request was dropped
    Busy,
}

/// The process-wide mutable state, made explicit.
#[derive(Debug)]
pub struct SessionState {
    /// Rotating buffer of previously generated idioms
    pub cache: RotationCache,
    /// Fingerprints shown since the last rotation reset
    pub seen: SeenSet,
    /// Saved idioms
    pub favorites: Favorites,
    /// The record currently on display; never persisted
    pub current: Option<IdiomRecord>,
}

impl SessionState {
    /// Fresh state with an empty cache of the given capacity.
    pub fn empty(cache_capacity: usize) -> Self {
        Self {
            cache: RotationCache::new(cache_capacity),
            seen: SeenSet::default(),
            favorites: Favorites::default(),
            current: None,
        }
    }
}

/// Session engine: one supply strategy, one persistence port, one state.
///
/// The state mutex doubles as the single-slot selection token: `next`
/// acquires it with `try_lock`, so a request arriving while a selection
/// (and its generation call) is pending is dropped as [`Selection::Busy`]
/// instead of stacking a duplicate network call.
pub struct Session {
    store: Arc<dyn StateStore>,
    supply: Box<dyn IdiomSupply>,
    state: Mutex<SessionState>,
}

impl Session {
    /// Load persisted state and build the engine.
    pub async fn load(
        store: Arc<dyn StateStore>,
        supply: Box<dyn IdiomSupply>,
        cache_capacity: usize,
    ) -> Result<Self, StoreError> {
        let entries: Vec<IdiomRecord> = read_key(&*store, keys::IDIOM_CACHE).await?;
        let seen_raw: Vec<String> = read_key(&*store, keys::SEEN_IDIOM_HASHES).await?;
        let membership: Vec<String> = read_key(&*store, keys::SAVED_IDIOMS).await?;
        let snapshots: HashMap<String, IdiomRecord> =
            read_key(&*store, keys::SAVED_IDIOMS_DATA).await?;

        let state = SessionState {
            cache: RotationCache::from_entries(entries, cache_capacity),
            seen: SeenSet::from_raw(seen_raw),
            favorites: Favorites::from_parts(membership, snapshots),
            current: None,
        };

        info!(
            cached = state.cache.len(),
            seen = state.seen.len(),
            saved = state.favorites.len(),
            "Session state loaded"
        );

        Ok(Self {
            store,
            supply,
            state: Mutex::new(state),
        })
    }

    /// Produce the next idiom to display.
    ///
    /// The returned record is marked seen and the state persisted *before*
    /// this returns, so a crash after selection can only re-show an idiom
    /// on next load, never silently skip one.
    pub async fn next(&self) -> Result<Selection, StoreError> {
        let mut state = match self.state.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("Selection already in flight, dropping request");
                return Ok(Selection::Busy);
            }
        };

        match self.supply.next(&mut state).await {
            SupplyOutcome::Idiom(record) => {
                state.seen.insert(record.fingerprint());
                self.persist(&state).await?;
                state.current = Some(record.clone());
                Ok(Selection::Idiom(record))
            }
            SupplyOutcome::Unavailable { notice } => Ok(Selection::Unavailable { notice }),
        }
    }

    /// The record currently on display, if any.
    pub async fn current(&self) -> Option<IdiomRecord> {
        self.state.lock().await.current.clone()
    }

    /// Toggle favorite status of the currently displayed record.
    ///
    /// Returns `None` when nothing is on display, otherwise whether the
    /// record is now saved. Only the current record may be favorited.
    pub async fn toggle_favorite(&self) -> Result<Option<bool>, StoreError> {
        let mut state = self.state.lock().await;
        let Some(record) = state.current.clone() else {
            return Ok(None);
        };

        let now_saved = state.favorites.toggle(&record);
        self.persist(&state).await?;
        debug!(fingerprint = %record.fingerprint(), saved = now_saved, "Favorite toggled");
        Ok(Some(now_saved))
    }

    /// Saved records in the order they were saved.
    pub async fn saved(&self) -> Vec<IdiomRecord> {
        self.state.lock().await.favorites.list().into_iter().cloned().collect()
    }

    /// Re-display a saved record by its position in the saved list.
    pub async fn show_saved(&self, index: usize) -> Option<IdiomRecord> {
        let mut state = self.state.lock().await;
        let record = state.favorites.list().get(index).map(|r| (*r).clone())?;
        state.current = Some(record.clone());
        Some(record)
    }

    /// Rewrite every state key wholesale.
    async fn persist(&self, state: &SessionState) -> Result<(), StoreError> {
        self.store
            .set(keys::IDIOM_CACHE, json!(state.cache.entries()))
            .await?;
        self.store
            .set(keys::SEEN_IDIOM_HASHES, json!(state.seen.to_raw()))
            .await?;
        self.store
            .set(keys::SAVED_IDIOMS, json!(state.favorites.membership()))
            .await?;
        self.store
            .set(keys::SAVED_IDIOMS_DATA, json!(state.favorites.snapshots()))
            .await?;
        Ok(())
    }
}

/// Read a key into a typed value, defaulting when absent or malformed.
///
/// A corrupted value is treated like an absent one: the extension never
/// refuses to start over a bad state file, it starts a fresh rotation.
async fn read_key<T>(store: &dyn StateStore, key: &str) -> Result<T, StoreError>
where
    T: serde::de::DeserializeOwned + Default,
{
    let Some(value) = store.get(key).await? else {
        return Ok(T::default());
    };
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding malformed persisted value");
            Ok(T::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::supply::DatasetSupply;
    use idiom_core::Dataset;

    fn dataset() -> Dataset {
        Dataset::from_json(
            r#"[
            {"id": "1", "languageCode": "xx", "languageName": "Test", "idiom": "only one",
             "meaningEn": "m", "exampleNative": "e", "exampleEn": "e"}
        ]"#,
        )
        .unwrap()
    }

    async fn session_over(store: Arc<dyn StateStore>) -> Session {
        Session::load(store, Box::new(DatasetSupply::new(dataset())), 10)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_next_marks_seen_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let session = session_over(store.clone()).await;

        let selection = session.next().await.unwrap();
        let record = match selection {
            Selection::Idiom(r) => r,
            other => panic!("expected idiom, got {other:?}"),
        };

        let seen = store.get(keys::SEEN_IDIOM_HASHES).await.unwrap().unwrap();
        let seen: Vec<String> = serde_json::from_value(seen).unwrap();
        assert!(seen.contains(&record.fingerprint().as_str().to_string()));
    }

    #[tokio::test]
    async fn test_current_tracks_last_shown() {
        let store = Arc::new(MemoryStore::new());
        let session = session_over(store).await;

        assert!(session.current().await.is_none());
        session.next().await.unwrap();
        assert_eq!(session.current().await.unwrap().idiom, "only one");
    }

    #[tokio::test]
    async fn test_favorite_requires_current() {
        let store = Arc::new(MemoryStore::new());
        let session = session_over(store).await;
        assert_eq!(session.toggle_favorite().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_favorite_round_trip_through_store() {
        let store = Arc::new(MemoryStore::new());
        let session = session_over(store.clone()).await;

        session.next().await.unwrap();
        assert_eq!(session.toggle_favorite().await.unwrap(), Some(true));

        // a fresh session over the same store sees the favorite
        let reloaded = session_over(store.clone()).await;
        let saved = reloaded.saved().await;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].idiom, "only one");

        // untoggle clears both membership and snapshot
        session.toggle_favorite().await.unwrap();
        let membership = store.get(keys::SAVED_IDIOMS).await.unwrap().unwrap();
        assert_eq!(membership, json!([]));
        let snapshots = store.get(keys::SAVED_IDIOMS_DATA).await.unwrap().unwrap();
        assert_eq!(snapshots, json!({}));
    }

    #[tokio::test]
    async fn test_show_saved_sets_current() {
        let store = Arc::new(MemoryStore::new());
        let session = session_over(store).await;

        session.next().await.unwrap();
        session.toggle_favorite().await.unwrap();

        let shown = session.show_saved(0).await.unwrap();
        assert_eq!(shown.idiom, "only one");
        assert_eq!(session.current().await.unwrap().idiom, "only one");
        assert!(session.show_saved(5).await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_persisted_value_starts_fresh() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(keys::IDIOM_CACHE, json!("definitely not a cache"))
            .await
            .unwrap();

        let session = session_over(store).await;
        // load succeeded with an empty cache instead of failing
        assert!(matches!(session.next().await.unwrap(), Selection::Idiom(_)));
    }
}
