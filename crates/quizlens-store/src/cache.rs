//! Suggestion result cache keyed by question identity.

use std::sync::Arc;

use quizlens_protocols::{KeyValueStore, StoreError, SuggestionResult};
use tracing::{debug, warn};

/// Default namespace for cache keys.
pub const DEFAULT_CACHE_PREFIX: &str = "quizlens-cache:";

/// Results cached per identity hash.
///
/// Entries never expire. The cache is a backing copy: the engine's session
/// state stays the source of truth for the question on screen.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl ResultCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_prefix(store, DEFAULT_CACHE_PREFIX)
    }

    pub fn with_prefix(store: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    fn key(&self, hash: &str) -> String {
        format!("{}{}", self.prefix, hash)
    }

    /// Cached result for `hash`. Unreadable entries count as absent.
    pub async fn get(&self, hash: &str) -> Option<SuggestionResult> {
        let key = self.key(hash);
        let value = match self.store.get(&key).await {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_value::<SuggestionResult>(value) {
            Ok(result) => {
                debug!("Cache hit for {}", key);
                Some(result)
            }
            Err(e) => {
                warn!("Ignoring malformed cache entry {}: {}", key, e);
                None
            }
        }
    }

    pub async fn set(&self, hash: &str, result: &SuggestionResult) -> Result<(), StoreError> {
        let value = serde_json::to_value(result)?;
        self.store.set(&self.key(hash), value).await
    }

    /// Hashes with a cached entry.
    pub async fn hashes(&self) -> Result<Vec<String>, StoreError> {
        let keys = self.store.keys().await?;
        Ok(keys
            .into_iter()
            .filter_map(|key| key.strip_prefix(&self.prefix).map(str::to_string))
            .collect())
    }
}
