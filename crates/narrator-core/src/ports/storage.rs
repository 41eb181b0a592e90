//! Key-value storage port used for the persisted session blob.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by [`KeyValueStore`] implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The value does not fit in the store's capacity.
    #[error("storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        /// Size of the rejected value in bytes.
        needed: usize,
        /// Capacity of the store in bytes.
        limit: usize,
    },

    /// Filesystem failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing location could not be resolved.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub const fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

/// A small string key-value store with a byte capacity.
///
/// # Design Rules
///
/// - A failed `set` leaves the previous value for that key intact
/// - Values are opaque strings; callers handle serialization
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
