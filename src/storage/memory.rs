//! In-process [`KeyValueStore`] backed by a `HashMap`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{KeyValueStore, StorageError};

/// Volatile key-value store. Contents are lost when the process exits.
///
/// Uses a sync [`Mutex`] since the critical section is brief (no awaits).
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one namespace.
    pub fn with_entry(key: &str, value: Vec<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_owned(), value);
        Self {
            entries: Mutex::new(entries),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<String>>, StorageError> {
        let map = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(format!("lock poisoned: {e}")))?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[String]) -> Result<(), StorageError> {
        let mut map = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(format!("lock poisoned: {e}")))?;
        map.insert(key.to_owned(), value.to_vec());
        Ok(())
    }
}
