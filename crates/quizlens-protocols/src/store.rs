//! Durable key-value storage trait.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::StoreError;

/// A key changed in the store. `new_value` is `None` after removal.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageChange {
    pub key: String,
    pub new_value: Option<Value>,
}

/// Host-local key-value store holding settings and cached results.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All keys currently stored.
    async fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Receive a [`StorageChange`] for every successful write or removal.
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}
