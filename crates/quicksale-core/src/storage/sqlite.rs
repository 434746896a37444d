//! `SQLite`-backed persistence medium

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::{migrations, KeyValueStore, StorageError, StorageResult};

/// Durable key-value medium stored in a local `SQLite` file
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a store at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                StorageError::Unavailable(format!(
                    "failed to create {}: {error}",
                    parent.display()
                ))
            })?;
        }

        let conn = Connection::open(path)?;
        tracing::debug!("Opened local store at {}", path.display());
        Self::from_connection(conn)
    }

    /// Open an in-memory store (useful for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        Self::configure(&conn)?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn configure(conn: &Connection) -> StorageResult<()> {
        // journal_mode returns a row, and in-memory databases report "memory"
        conn.query_row("PRAGMA journal_mode = WAL;", [], |_| Ok(()))
            .ok();
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        Ok(())
    }

    fn connection(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let conn = self.connection()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?",
                params![key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        let now = chrono::Utc::now().timestamp_millis();
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let conn = self.connection()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_get_delete() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get("queue").unwrap().is_none());

        store.set("queue", b"[1]").unwrap();
        store.set("queue", b"[1,2]").unwrap();
        assert_eq!(store.get("queue").unwrap().as_deref(), Some(&b"[1,2]"[..]));

        store.delete("queue").unwrap();
        assert!(store.get("queue").unwrap().is_none());
    }

    #[test]
    fn test_values_survive_reopen() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("quicksale.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("queue", b"persisted").unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("queue").unwrap().as_deref(),
            Some(&b"persisted"[..])
        );
    }
}
