//! Product catalog record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single catalog row. The search subsystem never mutates products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub brand: String,
    pub category: String,
    pub color: String,
    pub collection: String,
    #[serde(default)]
    pub description: String,
    /// Canonical shaft height: "high top", "mid top" or "low top".
    pub height: String,
    /// Canonical fit width: "wide", "regular" or "extra wide".
    pub width: String,
    pub price: f64,
    pub stock: u32,
    pub date_added: DateTime<Utc>,
}

impl Product {
    /// In-stock rows rank above out-of-stock rows on score ties.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
