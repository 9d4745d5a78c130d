//! Search engine clients
//!
//! Thin async clients for the two search engines the catalog can index into:
//!
//! - [`MeilisearchClient`]: indexes with asynchronous tasks that are polled to
//!   completion with a bounded wait.
//! - [`TypesenseClient`]: collections with a typed schema and synchronous
//!   JSONL document import.
//!
//! ```rust,no_run
//! use catalog_search_client::{MeilisearchClient, MeiliSearchRequest};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MeilisearchClient::new("http://localhost:7700", None)?;
//! let task = client.create_index("men-shirt", Some("product_id")).await?;
//! client.wait_for_task(&task, Duration::from_secs(10)).await?;
//! let page = client
//!     .search::<serde_json::Value>(
//!         "men-shirt",
//!         &MeiliSearchRequest { q: "blue", filter: None, limit: 10, offset: 0 },
//!     )
//!     .await?;
//! println!("{} hits", page.total());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod meilisearch;
pub mod models;
pub mod typesense;

pub use error::{Error, Result};
pub use meilisearch::MeilisearchClient;
pub use models::{
    CollectionField, CollectionInfo, CollectionSchema, IndexInfo, MeiliSearchRequest,
    MeiliSearchResponse, Task, TaskInfo, TaskStatus, TypesenseSearchParams,
    TypesenseSearchResponse,
};
pub use typesense::TypesenseClient;
