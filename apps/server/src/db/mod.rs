//! Database layer - product repository

pub mod products;
pub mod traits;

pub use products::PostgresProductStore;
pub use traits::ProductStore;
