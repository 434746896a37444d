//! Local persistence media backing the offline queue
//!
//! A medium is a small key-value byte store that survives process restarts.
//! Calls are synchronous: local reads and writes are treated as fast and are
//! never awaited inside the sync coordinator.

mod migrations;
mod sqlite;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

pub use sqlite::SqliteStore;

/// Failure of the local persistence medium itself
#[derive(Debug, Error)]
pub enum StorageError {
    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Stored bytes could not be encoded or decoded
    #[error("Stored value codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Medium cannot be reached (poisoned lock, quota, closed handle)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for key-value persistence operations
pub trait KeyValueStore: Send {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()>;

    /// Remove `key`; removing an absent key succeeds
    fn delete(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + Sync> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        (**self).delete(key)
    }
}

/// In-memory medium for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, Vec<u8>>) -> T,
    ) -> StorageResult<T> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(f(&mut entries))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value.to_vec());
        })
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", b"one").unwrap();
        store.set("k", b"two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"two"[..]));

        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.delete("k").unwrap();
    }
}
