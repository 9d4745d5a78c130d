//! Product catalog service
//!
//! - Products live in PostgreSQL and are loaded in bulk from CSV or Excel uploads
//! - Searches run against Meilisearch or Typesense indexes that are created on
//!   first use, one per `(people, category)` or `category` partition
//! - Synthetic datasets can be generated for load testing

#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod request_context;
pub mod search;
pub mod services;
pub mod startup;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
