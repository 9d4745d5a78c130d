//! Storage trait for the product table

use crate::{
    models::{Partition, Product},
    Result,
};
use async_trait::async_trait;

/// Relational access needed by the catalog service.
///
/// The production implementation is [`super::PostgresProductStore`]; tests
/// substitute an in-memory store.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products belonging to a search partition.
    ///
    /// Categories match case-insensitively anywhere in the stored value; the
    /// person segment, when present, matches case-insensitively as a prefix.
    async fn find_by_partition(&self, partition: &Partition) -> Result<Vec<Product>>;

    /// Load a CSV document (header row first, columns in
    /// [`crate::models::PRODUCT_COLUMNS`] order) in a single transaction.
    ///
    /// Returns the number of rows written. On failure nothing is committed.
    async fn bulk_copy_csv(&self, csv: Vec<u8>) -> Result<u64>;
}
