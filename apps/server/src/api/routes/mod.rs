pub mod admin;
pub mod metrics;
pub mod products;
