//! Bulk import handler

use crate::{
    api::extractors::Upload,
    services::ImportSummary,
    state::AppState,
    Error, Result,
};
use axum::{extract::State, Json};

/// POST /bulk-import (multipart, field `file`)
pub async fn bulk_import(
    State(state): State<AppState>,
    Upload(mut multipart): Upload,
) -> Result<Json<ImportSummary>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Malformed multipart body: {}", e.body_text())))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let contents = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(format!("Failed to read upload: {}", e.body_text())))?;

        tracing::info!(filename = %filename, bytes = contents.len(), "Bulk import upload received");
        let summary = state
            .import_service
            .import(&filename, contents.to_vec())
            .await?;
        return Ok(Json(summary));
    }

    Err(Error::Validation(
        "Multipart field 'file' is required".to_string(),
    ))
}
