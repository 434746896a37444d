use std::sync::Arc;
use std::time::Duration;

use quicksale_core::remote::SupabaseStore;
use quicksale_core::sync::{AutoFlush, Connectivity};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_watch(context: AppContext) -> Result<(), CliError> {
    let remote = context.supabase()?.clone();
    let AppContext {
        coordinator,
        connectivity,
        ..
    } = context;
    let probe_interval = coordinator.settings().probe_interval;
    let auto_flush = AutoFlush::new(Arc::clone(&coordinator));
    let (sender, receiver) = watch::channel(connectivity);

    println!(
        "Watching connectivity ({} pending). Press Ctrl-C to stop.",
        coordinator.pending_count()
    );

    tokio::select! {
        result = auto_flush.run(receiver) => result?,
        () = feed_connectivity(&remote, &sender, probe_interval) => {}
        signal = tokio::signal::ctrl_c() => {
            signal?;
            println!("Stopped ({} pending)", coordinator.pending_count());
        }
    }
    Ok(())
}

/// Probe the server every `interval` and publish changes until every
/// receiver is gone.
pub async fn feed_connectivity(
    remote: &SupabaseStore,
    sender: &watch::Sender<Connectivity>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    while !sender.is_closed() {
        ticker.tick().await;
        let current = Connectivity::from_online(remote.probe().await);
        if publish_connectivity(sender, current) {
            tracing::info!("Connectivity changed: {current:?}");
        }
    }
}

/// Returns whether `current` differs from the last published value.
pub fn publish_connectivity(sender: &watch::Sender<Connectivity>, current: Connectivity) -> bool {
    sender.send_if_modified(|last| {
        if *last == current {
            false
        } else {
            *last = current;
            true
        }
    })
}
