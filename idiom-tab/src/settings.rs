//! Settings operations.
//!
//! The credential surface of the original options page: save the API key,
//! test it with a minimal generation request, and clear the cached idiom
//! state. Testing never touches persisted idiom state.

use serde_json::json;
use tracing::info;

use idiom_agent::{GenerateError, IdiomGenerator};

use crate::store::{keys, StateStore, StoreError};

/// Persist the generation API credential.
pub async fn save_key(store: &dyn StateStore, api_key: &str) -> Result<(), StoreError> {
    store.set(keys::GEMINI_API_KEY, json!(api_key.trim())).await?;
    info!("Generation API key saved");
    Ok(())
}

/// Read the stored credential, if any.
pub async fn load_key(store: &dyn StateStore) -> Result<Option<String>, StoreError> {
    let Some(value) = store.get(keys::GEMINI_API_KEY).await? else {
        return Ok(None);
    };
    Ok(value.as_str().map(str::to_string).filter(|k| !k.is_empty()))
}

/// Verify a credential with the minimal connection-test request.
pub async fn test_key(generator: &dyn IdiomGenerator) -> Result<(), GenerateError> {
    generator.probe().await
}

/// Remove the idiom cache, seen history and legacy static-variant keys.
///
/// The credential and the favorites survive a cache clear.
pub async fn clear_cache(store: &dyn StateStore) -> Result<(), StoreError> {
    for key in [
        keys::IDIOM_CACHE,
        keys::SEEN_IDIOM_HASHES,
        keys::LEGACY_SEEN_IDS,
        keys::LEGACY_QUEUE,
    ] {
        store.remove(key).await?;
    }
    info!("Idiom cache and seen history cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use idiom_agent::MockGenerator;

    #[tokio::test]
    async fn test_key_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(load_key(&store).await.unwrap(), None);

        save_key(&store, "  secret-key ").await.unwrap();
        assert_eq!(load_key(&store).await.unwrap(), Some("secret-key".to_string()));
    }

    #[tokio::test]
    async fn test_empty_stored_key_reads_as_none() {
        let store = MemoryStore::new();
        save_key(&store, "").await.unwrap();
        assert_eq!(load_key(&store).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_probe_reports_failure() {
        let good = MockGenerator::new();
        assert!(test_key(&good).await.is_ok());

        let bad = MockGenerator::new().with_probe_failure();
        assert!(matches!(
            test_key(&bad).await,
            Err(GenerateError::Auth { .. })
        ));
    }

    #[tokio::test]
    async fn test_clear_cache_spares_credential_and_favorites() {
        let store = MemoryStore::new();
        store.set(keys::IDIOM_CACHE, json!([1])).await.unwrap();
        store.set(keys::SEEN_IDIOM_HASHES, json!(["fp"])).await.unwrap();
        store.set(keys::LEGACY_SEEN_IDS, json!(["id"])).await.unwrap();
        store.set(keys::LEGACY_QUEUE, json!([])).await.unwrap();
        store.set(keys::GEMINI_API_KEY, json!("secret")).await.unwrap();
        store.set(keys::SAVED_IDIOMS, json!(["fp"])).await.unwrap();

        clear_cache(&store).await.unwrap();

        assert_eq!(store.get(keys::IDIOM_CACHE).await.unwrap(), None);
        assert_eq!(store.get(keys::SEEN_IDIOM_HASHES).await.unwrap(), None);
        assert_eq!(store.get(keys::LEGACY_SEEN_IDS).await.unwrap(), None);
        assert_eq!(store.get(keys::LEGACY_QUEUE).await.unwrap(), None);
        assert!(store.get(keys::GEMINI_API_KEY).await.unwrap().is_some());
        assert!(store.get(keys::SAVED_IDIOMS).await.unwrap().is_some());
    }
}
