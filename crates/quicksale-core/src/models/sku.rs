//! Retail SKU catalog model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sellable item in the retail catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sku {
    pub id: i64,
    pub sku_name: String,
    /// Inactive SKUs stay in the catalog but are hidden from the sale picker
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for a new SKU
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSku {
    pub sku_name: String,
}

impl NewSku {
    /// Build an insert payload, returning `None` for blank names
    pub fn new(sku_name: &str) -> Option<Self> {
        let sku_name = sku_name.trim();
        if sku_name.is_empty() {
            None
        } else {
            Some(Self {
                sku_name: sku_name.to_string(),
            })
        }
    }
}

const fn default_active() -> bool {
    true
}
