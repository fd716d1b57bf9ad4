//! Product catalog: row types and the read-only store the search engine queries.

pub mod product;
pub mod store;

pub use product::Product;
pub use store::{Filters, MemoryStore, ProductStore, StoreError};

#[cfg(test)]
pub(crate) mod testutil {
    use super::Product;
    use chrono::TimeZone;

    /// Minimal product row for tests; everything not under test gets a
    /// sensible default.
    pub fn product(id: u64, title: &str, brand: &str, category: &str, color: &str) -> Product {
        Product {
            id,
            title: title.to_string(),
            brand: brand.to_string(),
            category: category.to_string(),
            color: color.to_string(),
            collection: "Classic".to_string(),
            description: String::new(),
            height: "low top".to_string(),
            width: "regular".to_string(),
            price: 100.0,
            stock: 5,
            date_added: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }
}
