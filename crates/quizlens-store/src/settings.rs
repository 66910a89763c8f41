//! User settings stored alongside the cache.

use std::sync::Arc;

use quizlens_protocols::{KeyValueStore, StorageChange, StoreError};
use serde_json::Value;
use tokio::sync::broadcast;

/// Storage key of the on/off switch. Not namespaced.
pub const AI_ENABLED_KEY: &str = "aiEnabled";

#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn KeyValueStore>,
}

impl Settings {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Whether suggestions are enabled. Defaults to `true` when unset.
    pub async fn ai_enabled(&self) -> Result<bool, StoreError> {
        let value = self.store.get(AI_ENABLED_KEY).await?;
        Ok(Self::enabled_from(value.as_ref()))
    }

    pub async fn set_ai_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.store.set(AI_ENABLED_KEY, Value::Bool(enabled)).await
    }

    /// Interpret a stored `aiEnabled` value; only an explicit `false`
    /// disables.
    pub fn enabled_from(value: Option<&Value>) -> bool {
        !matches!(value, Some(Value::Bool(false)))
    }

    /// New `aiEnabled` value carried by a change notification, if the change
    /// concerns it.
    pub fn ai_enabled_change(change: &StorageChange) -> Option<bool> {
        (change.key == AI_ENABLED_KEY).then(|| Self::enabled_from(change.new_value.as_ref()))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.store.subscribe()
    }
}
