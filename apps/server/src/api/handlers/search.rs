//! Product search handlers
//!
//! - `/product-search`: configured default backend, `category` required
//! - `/get-product-list/{meilisearch,typesense}`: `people` and `category` required
//! - `/get-product-list/{meilisearch,typesense}/v2`: `category` required, `people` filters

use crate::{
    api::extractors::QueryParams,
    config::BackendKind,
    models::{
        page::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE},
        PaginatedResult,
    },
    request_context::RequestContext,
    services::{CatalogSearchRequest, SearchVariant},
    state::AppState,
    Result,
};
use axum::{extract::State, Json};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    pub search: Option<String>,
    pub people: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
}

fn default_page() -> usize {
    DEFAULT_PAGE
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl From<SearchParams> for CatalogSearchRequest {
    fn from(p: SearchParams) -> Self {
        Self {
            page: p.page,
            page_size: p.page_size,
            search: p.search,
            people: p.people,
            category: p.category,
            min_price: p.min_price,
        }
    }
}

async fn run_search(
    state: &AppState,
    ctx: &RequestContext,
    backend: Option<BackendKind>,
    variant: SearchVariant,
    params: SearchParams,
) -> Result<Json<PaginatedResult>> {
    let backend = match backend {
        Some(kind) => state.backends.get(kind),
        None => state.backends.default_backend(),
    };
    tracing::debug!(
        request_id = %ctx.request_id,
        backend = %backend.kind(),
        ?variant,
        "Product search"
    );

    let result = state
        .catalog_search
        .search(&backend, variant, params.into())
        .await?;
    Ok(Json(result))
}

/// GET/POST /product-search
pub async fn product_search(
    State(state): State<AppState>,
    ctx: RequestContext,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<PaginatedResult>> {
    run_search(&state, &ctx, None, SearchVariant::Category, params).await
}

/// GET/POST /get-product-list/meilisearch
pub async fn meilisearch_by_people_and_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<PaginatedResult>> {
    run_search(
        &state,
        &ctx,
        Some(BackendKind::Meilisearch),
        SearchVariant::PeopleAndCategory,
        params,
    )
    .await
}

/// GET/POST /get-product-list/meilisearch/v2
pub async fn meilisearch_by_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<PaginatedResult>> {
    run_search(
        &state,
        &ctx,
        Some(BackendKind::Meilisearch),
        SearchVariant::Category,
        params,
    )
    .await
}

/// GET/POST /get-product-list/typesense
pub async fn typesense_by_people_and_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<PaginatedResult>> {
    run_search(
        &state,
        &ctx,
        Some(BackendKind::Typesense),
        SearchVariant::PeopleAndCategory,
        params,
    )
    .await
}

/// GET/POST /get-product-list/typesense/v2
pub async fn typesense_by_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<PaginatedResult>> {
    run_search(
        &state,
        &ctx,
        Some(BackendKind::Typesense),
        SearchVariant::Category,
        params,
    )
    .await
}
