//! Dummy dataset download handler

use crate::{
    api::extractors::QueryParams,
    services::{dataset, DatasetFormat},
    state::AppState,
    Result,
};
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DatasetParams {
    #[serde(default = "default_rows")]
    pub rows: u64,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_rows() -> u64 {
    100
}

fn default_format() -> String {
    "csv".to_string()
}

/// GET /generate-dataset?rows=100&format=csv|excel
pub async fn generate_dataset(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<DatasetParams>,
) -> Result<Response> {
    let format: DatasetFormat = params.format.parse()?;
    let generated = dataset::generate(params.rows, format, state.config.dataset.max_rows).await?;

    let content_type = match format {
        DatasetFormat::Csv => format!("{}; charset=utf-8", generated.content_type),
        DatasetFormat::Excel => generated.content_type.to_string(),
    };
    let disposition = format!("attachment; filename={}", generated.filename);

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        generated.bytes,
    )
        .into_response())
}
