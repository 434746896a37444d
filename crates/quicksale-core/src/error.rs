//! Error types for quicksale-core
//!
//! Operations report their own enums ([`crate::sync::SyncError`],
//! [`crate::storage::StorageError`], [`crate::remote::RemoteError`]); this
//! type covers setting up the crate.

use thiserror::Error;

/// Result type alias using quicksale-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building configuration for the crate
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
