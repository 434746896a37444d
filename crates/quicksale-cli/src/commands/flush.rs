use quicksale_core::sync::FlushOutcome;

use crate::commands::common::{format_flush_outcome, AppContext};
use crate::error::CliError;

pub async fn run_flush(context: &AppContext) -> Result<(), CliError> {
    context.supabase()?;
    if !context.connectivity.is_online() {
        println!(
            "Offline, {} pending",
            context.coordinator.pending_count()
        );
        return Ok(());
    }

    let outcome = context.coordinator.flush_queue(context.connectivity).await?;
    println!("{}", format_flush_outcome(&outcome));
    match outcome {
        FlushOutcome::FlushFailed { error, .. } => Err(error.into()),
        FlushOutcome::Flushed { .. } | FlushOutcome::NothingToFlush => Ok(()),
    }
}
