//! Paginated product search over lazily provisioned indexes
//!
//! Flow per request: validate -> resolve partition -> ensure index ->
//! build filters -> search -> check page range -> envelope.

use super::provisioner::IndexProvisioner;
use crate::{
    metrics,
    models::{page::round_ms, PageRequest, PaginatedResult, Partition},
    search::{SearchBackend, SearchFilters, SearchQuery},
    Error, Result,
};
use std::sync::Arc;
use std::time::Instant;

/// Which filter dimensions select the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchVariant {
    /// `people` and `category` are both required and together name the index.
    PeopleAndCategory,
    /// Only `category` is required; `people` becomes an optional filter.
    Category,
}

/// Raw search parameters as received from a client.
#[derive(Debug, Clone, Default)]
pub struct CatalogSearchRequest {
    pub page: usize,
    pub page_size: usize,
    pub search: Option<String>,
    pub people: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
}

pub struct CatalogSearchService {
    provisioner: Arc<IndexProvisioner>,
    max_page_size: usize,
}

impl CatalogSearchService {
    pub fn new(provisioner: Arc<IndexProvisioner>, max_page_size: usize) -> Self {
        Self {
            provisioner,
            max_page_size,
        }
    }

    pub async fn search(
        &self,
        backend: &Arc<dyn SearchBackend>,
        variant: SearchVariant,
        request: CatalogSearchRequest,
    ) -> Result<PaginatedResult> {
        let started = Instant::now();
        let outcome = self.run(backend, variant, request, started).await;

        let status = match &outcome {
            Ok(_) => "ok",
            Err(Error::Validation(_)) => "invalid",
            Err(Error::NotFound(_)) => "not_found",
            Err(_) => "error",
        };
        metrics::record_search(backend.kind(), status, started.elapsed());
        outcome
    }

    async fn run(
        &self,
        backend: &Arc<dyn SearchBackend>,
        variant: SearchVariant,
        request: CatalogSearchRequest,
        started: Instant,
    ) -> Result<PaginatedResult> {
        let page = PageRequest::new(request.page, request.page_size, self.max_page_size)?;
        let (partition, filters) = resolve(variant, &request)?;

        let handle = self.provisioner.ensure_index(backend, &partition).await?;

        let text = request
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let fetch = if page.is_addressable() { page } else { page.first() };
        let query = SearchQuery {
            text,
            filters: &filters,
            page: fetch,
        };
        let result = backend.search(&handle.name, &query).await?;

        let total_pages = page.ensure_in_range(result.total_items)?;
        let hits = if fetch == page { result.hits } else { Vec::new() };

        tracing::debug!(
            backend = %backend.kind(),
            index = %handle.name,
            page = page.page,
            total_items = result.total_items,
            hits = hits.len(),
            "Search completed"
        );

        Ok(PaginatedResult {
            page: page.page,
            page_size: page.page_size,
            total_items: result.total_items,
            total_pages,
            time: round_ms(started.elapsed()),
            data: hits,
        })
    }
}

/// Validate the filter dimensions and split them into index partition and
/// in-index filters.
pub fn resolve(
    variant: SearchVariant,
    request: &CatalogSearchRequest,
) -> Result<(Partition, SearchFilters)> {
    if let Some(min_price) = request.min_price {
        if !min_price.is_finite() || min_price < 0.0 {
            return Err(Error::Validation(
                "'min_price' must be greater than or equal to 0".to_string(),
            ));
        }
    }

    let people = non_blank(request.people.as_deref());
    let category = non_blank(request.category.as_deref());

    match variant {
        SearchVariant::PeopleAndCategory => match (people, category) {
            (Some(people), Some(category)) => Ok((
                Partition::people_and_category(people, category),
                SearchFilters {
                    min_price: request.min_price,
                    people: None,
                },
            )),
            _ => Err(Error::Validation(
                "Both 'people' and 'category' parameters are required.".to_string(),
            )),
        },
        SearchVariant::Category => match category {
            Some(category) => Ok((
                Partition::category(category),
                SearchFilters {
                    min_price: request.min_price,
                    people: people.map(str::to_string),
                },
            )),
            None => Err(Error::Validation(
                "'category' parameter is required.".to_string(),
            )),
        },
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
