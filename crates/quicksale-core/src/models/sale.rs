//! Sale record model

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Currency amounts are stored with minor-unit (cent) precision.
const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// A client-generated sale identifier, using UUID v7 (time-sortable)
///
/// Assigned once when the record is created and carried through every replay,
/// so a remote store with a unique constraint can discard duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaleId(Uuid);

impl SaleId {
    /// Create a new unique sale ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for SaleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SaleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Reasons a sale request is rejected before any side effect
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("SKU name must not be empty")]
    EmptySkuName,
    #[error("Quantity must be greater than zero (got {0})")]
    NonPositiveQuantity(Decimal),
    #[error("Price per unit must not be negative (got {0})")]
    NegativePrice(Decimal),
    #[error("Sale total is out of range")]
    AmountOverflow,
}

/// Unvalidated sale request coming from a front-end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleInput {
    pub sku_name: String,
    pub quantity: Decimal,
    pub price_per_unit: Decimal,
}

impl SaleInput {
    pub fn new(sku_name: impl Into<String>, quantity: Decimal, price_per_unit: Decimal) -> Self {
        Self {
            sku_name: sku_name.into(),
            quantity,
            price_per_unit,
        }
    }
}

/// One completed point-of-sale transaction
///
/// Immutable once created: fields are private and the total is computed a
/// single time in [`SaleRecord::create_at`]. Deserialization restores stored
/// values verbatim and never recomputes the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(rename = "client_sale_id")]
    id: SaleId,
    sku_name: String,
    quantity: Decimal,
    price_per_unit: Decimal,
    total_amount: Decimal,
    sale_timestamp: DateTime<Utc>,
}

impl SaleRecord {
    /// Validate `input` and create a record stamped with the current time
    pub fn create(input: &SaleInput) -> Result<Self, ValidationError> {
        Self::create_at(input, Utc::now())
    }

    /// Validate `input` and create a record stamped with `sale_timestamp`
    pub fn create_at(
        input: &SaleInput,
        sale_timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let sku_name = input.sku_name.trim();
        if sku_name.is_empty() {
            return Err(ValidationError::EmptySkuName);
        }
        if input.quantity <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveQuantity(input.quantity));
        }
        if input.price_per_unit < Decimal::ZERO {
            return Err(ValidationError::NegativePrice(input.price_per_unit));
        }

        let total_amount = input
            .quantity
            .checked_mul(input.price_per_unit)
            .ok_or(ValidationError::AmountOverflow)?
            .round_dp_with_strategy(AMOUNT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);

        Ok(Self {
            id: SaleId::new(),
            sku_name: sku_name.to_string(),
            quantity: input.quantity,
            price_per_unit: input.price_per_unit,
            total_amount,
            sale_timestamp,
        })
    }

    pub const fn id(&self) -> SaleId {
        self.id
    }

    pub fn sku_name(&self) -> &str {
        &self.sku_name
    }

    pub const fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub const fn price_per_unit(&self) -> Decimal {
        self.price_per_unit
    }

    /// Total fixed at creation time
    pub const fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub const fn sale_timestamp(&self) -> DateTime<Utc> {
        self.sale_timestamp
    }
}

/// A sale as read back from the remote table
///
/// Rows written before client ids existed have no `client_sale_id`, and the
/// table assigns its own `id`, so both are optional here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRow {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub client_sale_id: Option<SaleId>,
    pub sku_name: String,
    pub quantity: Decimal,
    pub price_per_unit: Decimal,
    pub total_amount: Decimal,
    pub sale_timestamp: DateTime<Utc>,
}

impl From<&SaleRecord> for SaleRow {
    fn from(record: &SaleRecord) -> Self {
        Self {
            id: None,
            client_sale_id: Some(record.id),
            sku_name: record.sku_name.clone(),
            quantity: record.quantity,
            price_per_unit: record.price_per_unit,
            total_amount: record.total_amount,
            sale_timestamp: record.sale_timestamp,
        }
    }
}
