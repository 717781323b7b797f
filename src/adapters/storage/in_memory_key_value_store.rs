//! In-Memory Key-Value Store Adapter
//!
//! Keeps values in a map. Useful for testing and for sessions that do not
//! need to outlive the process.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{KeyValueStore, StorageError};

/// In-memory key-value store
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    values: Arc<RwLock<HashMap<String, String>>>,
    failure: Arc<RwLock<Option<StorageError>>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one value
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), value.into());
        Self {
            values: Arc::new(RwLock::new(values)),
            failure: Arc::new(RwLock::new(None)),
        }
    }

    /// Make every subsequent call fail with `error` (useful for tests)
    pub async fn fail_with(&self, error: StorageError) {
        *self.failure.write().await = Some(error);
    }

    /// Stop injecting failures
    pub async fn recover(&self) {
        *self.failure.write().await = None;
    }

    /// Get the number of stored values
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }

    async fn check_failure(&self) -> Result<(), StorageError> {
        match self.failure.read().await.as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_failure().await?;
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_failure().await?;
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = InMemoryKeyValueStore::new();

        assert_eq!(store.get("absent").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = InMemoryKeyValueStore::new();

        store.set("spec", "{}").await.unwrap();
        store.set("spec", "{\"a\":1}").await.unwrap();

        assert_eq!(store.get("spec").await.unwrap().as_deref(), Some("{\"a\":1}"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryKeyValueStore::with_value("k", "v");
        let clone = store.clone();

        clone.set("k", "w").await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("w"));
    }

    #[tokio::test]
    async fn injected_failure_until_recovered() {
        let store = InMemoryKeyValueStore::new();
        store.fail_with(StorageError::unavailable("offline")).await;

        assert_eq!(
            store.set("k", "v").await,
            Err(StorageError::Unavailable("offline".to_string()))
        );
        assert!(store.get("k").await.is_err());

        store.recover().await;
        assert!(store.set("k", "v").await.is_ok());
    }
}
