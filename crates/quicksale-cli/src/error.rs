use std::io;

use quicksale_core::remote::RemoteError;
use quicksale_core::storage::StorageError;
use quicksale_core::sync::SyncError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] quicksale_core::Error),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("SKU name cannot be empty")]
    EmptySkuName,
    #[error("The server is unreachable; this command needs a connection")]
    Offline,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Supabase is not configured. Run `quicksale config init`, or set QUICKSALE_SUPABASE_URL and QUICKSALE_SUPABASE_ANON_KEY."
    )]
    NotConfigured,
}
