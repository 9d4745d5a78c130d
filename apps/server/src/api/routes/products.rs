//! Product search, import and dataset routes

use crate::api::handlers::{dataset, import, search};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/product-search",
            get(search::product_search).post(search::product_search),
        )
        .route(
            "/get-product-list/meilisearch",
            get(search::meilisearch_by_people_and_category)
                .post(search::meilisearch_by_people_and_category),
        )
        .route(
            "/get-product-list/meilisearch/v2",
            get(search::meilisearch_by_category).post(search::meilisearch_by_category),
        )
        .route(
            "/get-product-list/typesense",
            get(search::typesense_by_people_and_category)
                .post(search::typesense_by_people_and_category),
        )
        .route(
            "/get-product-list/typesense/v2",
            get(search::typesense_by_category).post(search::typesense_by_category),
        )
        .route("/bulk-import", post(import::bulk_import))
        .route("/bulk-product-import/v5", post(import::bulk_import))
        .route("/generate-dataset", get(dataset::generate_dataset))
        .route(
            "/generate-dummy-product-dataset",
            get(dataset::generate_dataset),
        )
}
