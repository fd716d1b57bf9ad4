//! Product store abstraction
//!
//! The search subsystem is read-only against the catalog: it hands a
//! structured query plan plus the caller's filters to a `ProductStore` and
//! gets candidate rows back. The shipped backend evaluates the predicates
//! directly over an in-memory catalog loaded from a JSON file; a SQL-speaking
//! backend would instead consume `QueryPlan::render()`.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::catalog::product::Product;
use crate::search::predicate::QueryPlan;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
    #[error("Catalog read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Caller-supplied filter dimensions for the full-results variant.
///
/// Every dimension is optional; invalid values are dropped per dimension
/// before the store is queried, never turned into request failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Filters {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.brand.is_none()
            && self.color.is_none()
            && self.price_min.is_none()
            && self.price_max.is_none()
    }

    /// Whether a row passes every active dimension. String dimensions compare
    /// case-insensitively against the canonical stored value.
    pub fn matches(&self, product: &Product) -> bool {
        fn eq_ci(filter: &Option<String>, value: &str) -> bool {
            match filter {
                Some(wanted) => wanted.eq_ignore_ascii_case(value),
                None => true,
            }
        }

        eq_ci(&self.category, &product.category)
            && eq_ci(&self.brand, &product.brand)
            && eq_ci(&self.color, &product.color)
            && self.price_min.is_none_or(|min| product.price >= min)
            && self.price_max.is_none_or(|max| product.price <= max)
    }
}

/// Read-only product storage the search engine queries.
///
/// Implementations may return the same row more than once when several tiers
/// fire for it; the engine deduplicates by `id` afterwards.
pub trait ProductStore: Send + Sync {
    fn candidates(&self, plan: &QueryPlan, filters: &Filters) -> Result<Vec<Product>, StoreError>;
}

/// Catalog held fully in memory, loaded once from a JSON file.
#[derive(Debug)]
pub struct MemoryStore {
    products: Vec<Product>,
}

impl MemoryStore {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let products: Vec<Product> = serde_json::from_str(&raw)?;
        debug!("Loaded {} catalog rows from {}", products.len(), path.as_ref().display());
        Ok(Self::new(products))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductStore for MemoryStore {
    fn candidates(&self, plan: &QueryPlan, filters: &Filters) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .products
            .iter()
            .filter(|p| filters.matches(p))
            .filter(|p| plan.matches(p))
            .cloned()
            .collect())
    }
}
