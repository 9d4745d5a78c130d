//! Pluggable search backends
//!
//! Both engines are driven through [`SearchBackend`], so index provisioning,
//! filtering and pagination are written once in the service layer. Only the
//! wire-level details (task waiting, schemas, filter syntax, paging style)
//! live in the backend implementations.

pub mod meilisearch;
pub mod typesense;

pub use self::meilisearch::MeilisearchBackend;
pub use self::typesense::TypesenseBackend;

use crate::{
    config::BackendKind,
    models::{PageRequest, ProductDocument},
    Result,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Fields matched by free-text queries, in priority order.
pub const SEARCHABLE_FIELDS: [&str; 3] = ["name", "manufacturer", "description"];

/// Fields usable in filter expressions.
pub const FILTERABLE_FIELDS: [&str; 2] = ["price", "people"];

pub const PRIMARY_KEY: &str = "product_id";

/// Optional narrowing predicates, AND-combined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    /// Inclusive lower bound on price
    pub min_price: Option<f64>,
    /// Exact person segment
    pub people: Option<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.min_price.is_none() && self.people.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct SearchQuery<'a> {
    /// Free text; `None` matches every document
    pub text: Option<&'a str>,
    pub filters: &'a SearchFilters,
    pub page: PageRequest,
}

/// One page of hits plus the engine's total hit count.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub total_items: u64,
    pub hits: Vec<ProductDocument>,
}

/// Capability interface over a remote search engine.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn index_exists(&self, index: &str) -> Result<bool>;

    /// Create the index with its schema/settings and load `documents`,
    /// returning once the engine has confirmed every step.
    ///
    /// An "already exists" answer from the engine is not an error: the
    /// documents are still written (idempotently, keyed by `product_id`).
    async fn create_index(&self, index: &str, documents: &[ProductDocument]) -> Result<()>;

    /// Drop an index. Returns `false` when there was nothing to drop.
    async fn delete_index(&self, index: &str) -> Result<bool>;

    /// Engine-specific rendering of `filters`; `None` when no filter applies.
    fn filter_expression(&self, filters: &SearchFilters) -> Option<String>;

    async fn search(&self, index: &str, query: &SearchQuery<'_>) -> Result<SearchPage>;
}

/// The configured backends, addressable by kind.
#[derive(Clone)]
pub struct SearchBackends {
    meilisearch: Arc<dyn SearchBackend>,
    typesense: Arc<dyn SearchBackend>,
    default_kind: BackendKind,
}

impl SearchBackends {
    pub fn new(
        meilisearch: Arc<dyn SearchBackend>,
        typesense: Arc<dyn SearchBackend>,
        default_kind: BackendKind,
    ) -> Self {
        Self {
            meilisearch,
            typesense,
            default_kind,
        }
    }

    pub fn get(&self, kind: BackendKind) -> Arc<dyn SearchBackend> {
        match kind {
            BackendKind::Meilisearch => self.meilisearch.clone(),
            BackendKind::Typesense => self.typesense.clone(),
        }
    }

    pub fn default_backend(&self) -> Arc<dyn SearchBackend> {
        self.get(self.default_kind)
    }

    pub fn default_kind(&self) -> BackendKind {
        self.default_kind
    }
}

/// Render a price bound without a trailing `.0` for whole numbers.
pub(crate) fn format_price(price: f64) -> String {
    if price.fract() == 0.0 && price.abs() < 1e15 {
        format!("{}", price as i64)
    } else {
        format!("{}", price)
    }
}
