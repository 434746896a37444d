//! Flush triggers: startup, connectivity restored, and periodic retry.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::{Connectivity, FlushOutcome, SyncCoordinator, SyncResult};
use crate::remote::RemoteStore;
use crate::storage::KeyValueStore;

/// Drives [`SyncCoordinator::flush_queue`] from host connectivity events.
pub struct AutoFlush<S, R> {
    coordinator: Arc<SyncCoordinator<S, R>>,
}

impl<S: KeyValueStore, R: RemoteStore> AutoFlush<S, R> {
    pub const fn new(coordinator: Arc<SyncCoordinator<S, R>>) -> Self {
        Self { coordinator }
    }

    /// One flush attempt at process start.
    pub async fn on_startup(&self, connectivity: Connectivity) -> SyncResult<FlushOutcome> {
        tracing::debug!("Startup flush ({connectivity:?})");
        self.coordinator.flush_queue(connectivity).await
    }

    /// Flush on every offline to online transition, and retry on
    /// `retry_interval` while online with sales still pending.
    ///
    /// Returns once the connectivity sender is dropped. Local storage failures
    /// end the loop and are returned to the host.
    pub async fn run(&self, mut connectivity: watch::Receiver<Connectivity>) -> SyncResult<()> {
        let mut last = *connectivity.borrow_and_update();
        let mut retry = tokio::time::interval(self.coordinator.settings().retry_interval);
        retry.set_missed_tick_behavior(MissedTickBehavior::Delay);
        retry.tick().await;

        loop {
            tokio::select! {
                changed = connectivity.changed() => {
                    if changed.is_err() {
                        tracing::debug!("Connectivity source closed; stopping auto flush");
                        return Ok(());
                    }
                    let current = *connectivity.borrow_and_update();
                    let restored = !last.is_online() && current.is_online();
                    last = current;
                    if restored {
                        tracing::info!("Connectivity restored; flushing offline sales");
                        self.coordinator.flush_queue(current).await?;
                    }
                }
                _ = retry.tick() => {
                    if last.is_online() && self.coordinator.pending_count() > 0 {
                        tracing::debug!("Retrying flush of pending sales");
                        self.coordinator.flush_queue(last).await?;
                    }
                }
            }
        }
    }
}
