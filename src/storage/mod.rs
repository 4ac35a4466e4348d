//! Namespaced key-value persistence for string sequences.
//!
//! The trust registry only needs two operations: read the sequence stored
//! under a namespace key, and replace it. Backends implement
//! [`KeyValueStore`]; [`sqlite::SqliteStore`] is the durable one and
//! [`memory::MemoryStore`] keeps everything in process.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

pub use self::memory::MemoryStore;
pub use self::sqlite::SqliteStore;

/// Separator between the application prefix and the feature key.
const NAMESPACE_SEPARATOR: char = ':';

/// Errors from storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored value is not a JSON array of strings.
    #[error("malformed value under {key}: {source}")]
    Malformed {
        /// Namespace key holding the bad value.
        key: String,
        /// Underlying decode error.
        source: serde_json::Error,
    },

    /// Value could not be encoded for storage.
    #[error("failed to encode value: {0}")]
    Encode(serde_json::Error),

    /// The backend cannot be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage of string sequences keyed by namespace.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the sequence stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<Vec<String>>, StorageError>;

    /// Replace the sequence stored under `key`.
    async fn set(&self, key: &str, value: &[String]) -> Result<(), StorageError>;
}

/// Build a namespaced storage key, e.g. `linkgate:trusted-external-link`.
pub fn storage_ns(prefix: &str, key: &str) -> String {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return key.to_owned();
    }
    format!("{prefix}{NAMESPACE_SEPARATOR}{key}")
}
