//! Local durable queue of pending sale records
//!
//! The whole queue is serialized as one JSON array under a fixed key, so the
//! medium only ever sees whole-queue writes. Records are never removed one by
//! one: the queue is either appended to or cleared after a confirmed flush.

use crate::models::SaleRecord;
use crate::storage::{KeyValueStore, StorageResult};

/// Key under which the pending sales are persisted
pub const OFFLINE_QUEUE_KEY: &str = "offline_sales_queue";

/// Ordered, append-only holding area for sales not yet stored remotely
pub struct LocalQueue<S> {
    store: S,
}

impl<S: KeyValueStore> LocalQueue<S> {
    /// Create a queue persisted under [`OFFLINE_QUEUE_KEY`]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Append one record after all existing ones
    pub fn append(&self, record: SaleRecord) -> StorageResult<()> {
        let mut records = self.read_all()?;
        records.push(record);
        let encoded = serde_json::to_vec(&records)?;
        self.store.set(OFFLINE_QUEUE_KEY, &encoded)?;
        tracing::debug!("Queued sale locally ({} pending)", records.len());
        Ok(())
    }

    /// All pending records, oldest first
    pub fn read_all(&self) -> StorageResult<Vec<SaleRecord>> {
        match self.store.get(OFFLINE_QUEUE_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    /// Drop every pending record
    pub fn clear(&self) -> StorageResult<()> {
        self.store.delete(OFFLINE_QUEUE_KEY)
    }

    /// Number of pending records
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.read_all()?.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}
