//! Operator endpoints

use crate::{
    api::extractors::QueryParams,
    config::BackendKind,
    models::Partition,
    state::AppState,
    Error, Result,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ReindexParams {
    pub backend: Option<String>,
    pub category: Option<String>,
    pub people: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReindexResponse {
    pub status: &'static str,
    pub backend: BackendKind,
    pub index: String,
    pub documents: usize,
}

/// POST /admin/reindex?backend=..&category=..[&people=..]
///
/// Drops and rebuilds one partition index from the current table contents.
pub async fn reindex(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ReindexParams>,
) -> Result<Json<ReindexResponse>> {
    let kind = match params.backend.as_deref() {
        Some(name) => name.parse::<BackendKind>().map_err(Error::Validation)?,
        None => state.backends.default_kind(),
    };
    let category = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| Error::Validation("'category' parameter is required.".to_string()))?;
    let partition = match params.people.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        Some(people) => Partition::people_and_category(people, category),
        None => Partition::category(category),
    };

    let backend = state.backends.get(kind);
    let handle = state.provisioner.reindex(&backend, &partition).await?;

    Ok(Json(ReindexResponse {
        status: "success",
        backend: handle.backend,
        index: handle.name,
        documents: handle.documents,
    }))
}
