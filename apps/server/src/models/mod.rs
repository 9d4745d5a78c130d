//! Domain models for the catalog service

pub mod page;
pub mod partition;
pub mod product;

pub use page::{PageRequest, PaginatedResult};
pub use partition::Partition;
pub use product::{Product, ProductDocument, PRODUCT_COLUMNS};
