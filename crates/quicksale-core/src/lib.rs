//! quicksale-core - Core library for Quick Sale
//!
//! This crate contains the sale models, the local durable queue, the remote
//! store client, and the sync coordinator that routes sales between them.
//! Front-ends (currently the CLI) stay thin and drive these types directly.

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod queue;
pub mod remote;
pub mod storage;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{SaleId, SaleInput, SaleRecord};
