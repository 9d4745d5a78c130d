//! Product row and its search-document form

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Column order of the `product` table, shared by bulk-copy import and
/// dataset generation so generated files can be imported unchanged.
pub const PRODUCT_COLUMNS: [&str; 8] = [
    "product_id",
    "name",
    "people",
    "category",
    "price",
    "stock_quantity",
    "manufacturer",
    "description",
];

/// A product as stored in the relational table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub product_id: Uuid,
    pub name: String,
    /// Person segment, e.g. "Men", "Women"
    pub people: String,
    pub category: String,
    /// Always > 0
    pub price: f64,
    /// Always >= 0
    pub stock_quantity: i32,
    pub manufacturer: String,
    pub description: String,
}

/// Flattened, JSON-serializable product as held in a search index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    pub product_id: String,
    pub name: String,
    pub people: String,
    pub category: String,
    pub price: f64,
    pub stock_quantity: i32,
    pub manufacturer: String,
    pub description: String,
}

impl From<Product> for ProductDocument {
    fn from(p: Product) -> Self {
        Self {
            product_id: p.product_id.to_string(),
            name: p.name,
            people: p.people,
            category: p.category,
            price: p.price,
            stock_quantity: p.stock_quantity,
            manufacturer: p.manufacturer,
            description: p.description,
        }
    }
}
