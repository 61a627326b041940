//! Persisted key-value storage port

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored data could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// No location is available for the storage file.
    #[error("no storage location available")]
    NoLocation,
}

/// Port for string-keyed persistent storage surviving restarts.
///
/// Shaped after browser `localStorage`: values are opaque strings and
/// callers own their encoding.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Reads a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Removes a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
