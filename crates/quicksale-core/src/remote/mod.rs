//! Remote relational store the sales are committed to

mod supabase;

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::models::SaleRecord;

pub use supabase::SupabaseStore;

/// Failure of a remote read or write
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Remote request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("Remote store rejected the request: {message} ({status})")]
    Api { status: u16, message: String },
    #[error("Remote request timed out")]
    Timeout,
    #[error("Invalid remote request: {0}")]
    InvalidRequest(String),
    #[error("Invalid remote store configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(error)
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Write side of the remote sales table
///
/// Each call either commits atomically or reports failure. Callers assume
/// nothing was committed when an error comes back.
pub trait RemoteStore: Send + Sync {
    /// Insert a single sale
    fn insert_one(&self, record: &SaleRecord) -> impl Future<Output = RemoteResult<()>> + Send;

    /// Insert all `records` in one request, preserving their order
    fn insert_many(&self, records: &[SaleRecord])
        -> impl Future<Output = RemoteResult<()>> + Send;
}

impl<T: RemoteStore> RemoteStore for Arc<T> {
    fn insert_one(&self, record: &SaleRecord) -> impl Future<Output = RemoteResult<()>> + Send {
        (**self).insert_one(record)
    }

    fn insert_many(
        &self,
        records: &[SaleRecord],
    ) -> impl Future<Output = RemoteResult<()>> + Send {
        (**self).insert_many(records)
    }
}
