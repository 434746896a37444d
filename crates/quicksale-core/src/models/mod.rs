//! Data models for Quick Sale

mod sale;
mod sku;

pub use sale::{SaleId, SaleInput, SaleRecord, SaleRow, ValidationError};
pub use sku::{NewSku, Sku};
