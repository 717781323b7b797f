//! Key-Value Store Port - Interface for persisting the specification.
//!
//! The document store persists exactly one serialized specification under a
//! fixed key. Any string-keyed store satisfies the contract.

use async_trait::async_trait;

/// Errors that can occur during key-value storage operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn io(message: impl Into<String>) -> Self {
        StorageError::Io(message.into())
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        StorageError::Serialization(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        StorageError::Unavailable(message.into())
    }
}

/// Port for a durable string key-value store.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` for a key that was never written
/// - Replace the whole value on `set` (no partial writes are observable)
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    /// Returns `StorageError` if the backing store cannot be read
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns `StorageError` if the write fails
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
