//! Sync coordinator: routes sales to the remote store or the offline queue.
//!
//! Every operation runs under one queue lock, so a submit and a flush never
//! overlap on the same device. Flushes additionally take a non-blocking permit:
//! a second flush requested while one is in flight returns immediately instead
//! of re-reading the same pending set.

mod trigger;

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;
use tokio::sync::{watch, Mutex};

use crate::config::SyncSettings;
use crate::models::{SaleInput, SaleRecord, ValidationError};
use crate::queue::LocalQueue;
use crate::remote::{RemoteError, RemoteResult, RemoteStore};
use crate::storage::{KeyValueStore, StorageError};

pub use trigger::AutoFlush;

/// Best-effort view of the device's network reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub const fn from_online(online: bool) -> Self {
        if online {
            Self::Online
        } else {
            Self::Offline
        }
    }

    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// What the coordinator is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatorState {
    #[default]
    Idle,
    Submitting,
    Flushing,
}

/// Why a sale ended up in the local queue.
#[derive(Debug)]
pub enum QueueReason {
    /// Device was known to be offline; no remote attempt was made
    Offline,
    /// The direct remote write failed or timed out
    RemoteFailed(RemoteError),
}

/// Result of recording one sale.
#[derive(Debug)]
pub enum RecordOutcome {
    Committed(SaleRecord),
    QueuedLocally {
        record: SaleRecord,
        reason: QueueReason,
    },
}

impl RecordOutcome {
    pub const fn record(&self) -> &SaleRecord {
        match self {
            Self::Committed(record) | Self::QueuedLocally { record, .. } => record,
        }
    }

    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Result of one flush attempt.
#[derive(Debug)]
pub enum FlushOutcome {
    Flushed { count: usize },
    NothingToFlush,
    /// The bulk write failed; all `pending` records are still queued
    FlushFailed { pending: usize, error: RemoteError },
}

/// Errors surfaced by the coordinator.
///
/// Remote failures never appear here: `record_sale` absorbs them into the
/// queue and `flush_queue` reports them as [`FlushOutcome::FlushFailed`].
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] crate::Error),
    #[error("Invalid sale: {0}")]
    Validation(#[from] ValidationError),
    #[error("Local storage failure: {0}")]
    LocalStorage(#[from] StorageError),
}

pub type SyncResult<T> = Result<T, SyncError>;

/// Owns the local queue for one device and decides where each sale goes.
pub struct SyncCoordinator<S, R> {
    queue: Mutex<LocalQueue<S>>,
    remote: R,
    settings: SyncSettings,
    flush_permit: Mutex<()>,
    pending: AtomicUsize,
    state: watch::Sender<CoordinatorState>,
}

impl<S: KeyValueStore, R: RemoteStore> SyncCoordinator<S, R> {
    /// Build a coordinator over `store`, restoring whatever was queued before.
    ///
    /// Fails on settings with a zero duration.
    pub fn open(store: S, remote: R, settings: SyncSettings) -> SyncResult<Self> {
        settings.validate()?;
        let queue = LocalQueue::new(store);
        let pending = queue.len()?;
        if pending > 0 {
            tracing::info!("Restored {pending} offline sales awaiting sync");
        }

        let (state, _) = watch::channel(CoordinatorState::Idle);
        Ok(Self {
            queue: Mutex::new(queue),
            remote,
            settings,
            flush_permit: Mutex::new(()),
            pending: AtomicUsize::new(pending),
            state,
        })
    }

    /// Record a sale, falling back to the local queue when the remote write
    /// is skipped or fails.
    pub async fn record_sale(
        &self,
        input: &SaleInput,
        connectivity: Connectivity,
    ) -> SyncResult<RecordOutcome> {
        let record = SaleRecord::create(input)?;
        let queue = self.queue.lock().await;

        if !connectivity.is_online() {
            self.enqueue(&queue, record.clone())?;
            tracing::info!("Offline: sale {} saved locally", record.id());
            return Ok(RecordOutcome::QueuedLocally {
                record,
                reason: QueueReason::Offline,
            });
        }

        let _state = self.enter(CoordinatorState::Submitting);
        match self.bounded(self.remote.insert_one(&record)).await {
            Ok(()) => {
                tracing::info!("Sale {} committed", record.id());
                Ok(RecordOutcome::Committed(record))
            }
            Err(error) => {
                tracing::warn!("Remote write failed, saving sale {} locally: {error}", record.id());
                self.enqueue(&queue, record.clone())?;
                Ok(RecordOutcome::QueuedLocally {
                    record,
                    reason: QueueReason::RemoteFailed(error),
                })
            }
        }
    }

    /// Write every pending sale to the remote store in one request.
    ///
    /// The queue is cleared only after the remote confirms the write. If the
    /// clear itself fails the records stay queued and will be sent again.
    pub async fn flush_queue(&self, connectivity: Connectivity) -> SyncResult<FlushOutcome> {
        if !connectivity.is_online() {
            tracing::debug!("Offline: skipping flush");
            return Ok(FlushOutcome::NothingToFlush);
        }

        let Ok(_permit) = self.flush_permit.try_lock() else {
            tracing::debug!("Flush already in flight");
            return Ok(FlushOutcome::NothingToFlush);
        };

        let queue = self.queue.lock().await;
        let records = queue.read_all()?;
        if records.is_empty() {
            return Ok(FlushOutcome::NothingToFlush);
        }

        let _state = self.enter(CoordinatorState::Flushing);
        let count = records.len();
        match self.bounded(self.remote.insert_many(&records)).await {
            Ok(()) => {
                queue.clear()?;
                self.pending.store(0, Ordering::SeqCst);
                tracing::info!("Flushed {count} offline sales");
                Ok(FlushOutcome::Flushed { count })
            }
            Err(error) => {
                tracing::warn!("Flush of {count} offline sales failed: {error}");
                Ok(FlushOutcome::FlushFailed {
                    pending: count,
                    error,
                })
            }
        }
    }

    /// Pending records in append order.
    pub async fn pending_records(&self) -> SyncResult<Vec<SaleRecord>> {
        Ok(self.queue.lock().await.read_all()?)
    }

    fn enqueue(&self, queue: &LocalQueue<S>, record: SaleRecord) -> SyncResult<()> {
        queue.append(record)?;
        self.pending.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn bounded(&self, call: impl Future<Output = RemoteResult<()>>) -> RemoteResult<()> {
        tokio::time::timeout(self.settings.remote_timeout, call)
            .await
            .unwrap_or(Err(RemoteError::Timeout))
    }
}

impl<S, R> SyncCoordinator<S, R> {
    /// Number of sales waiting in the local queue.
    ///
    /// Served from a counter so it never waits on an in-flight remote call.
    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> CoordinatorState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<CoordinatorState> {
        self.state.subscribe()
    }

    pub const fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    fn enter(&self, state: CoordinatorState) -> StateGuard<'_> {
        self.state.send_replace(state);
        StateGuard { state: &self.state }
    }
}

/// Returns the coordinator to `Idle` however the attempt ends.
struct StateGuard<'a> {
    state: &'a watch::Sender<CoordinatorState>,
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        self.state.send_replace(CoordinatorState::Idle);
    }
}
