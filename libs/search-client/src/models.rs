//! Wire models for the Meilisearch and Typesense REST APIs.
//!
//! Only the fields this crate reads or writes are modelled; unknown fields
//! in responses are ignored.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Meilisearch
// ---------------------------------------------------------------------------

/// Error body returned by Meilisearch for every non-2xx response.
#[derive(Debug, Clone, Deserialize)]
pub struct MeiliErrorBody {
    pub message: String,
    pub code: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexInfo {
    pub uid: String,
    #[serde(default)]
    pub primary_key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIndexRequest<'a> {
    pub uid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<&'a str>,
}

/// Summary returned when Meilisearch enqueues an asynchronous task.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub task_uid: u64,
    #[serde(default)]
    pub index_uid: Option<String>,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub task_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Enqueued,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl TaskStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskError {
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub uid: u64,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub error: Option<TaskError>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeiliSearchRequest<'a> {
    pub q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a str>,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeiliSearchResponse<T> {
    pub hits: Vec<T>,
    #[serde(default)]
    pub estimated_total_hits: Option<u64>,
    #[serde(default)]
    pub total_hits: Option<u64>,
    #[serde(default)]
    pub processing_time_ms: u64,
}

impl<T> MeiliSearchResponse<T> {
    /// Exhaustive total when the engine reported one, otherwise the estimate.
    pub fn total(&self) -> u64 {
        self.total_hits.or(self.estimated_total_hits).unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Typesense
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TypesenseErrorBody {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub facet: bool,
}

impl CollectionField {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            facet: false,
        }
    }

    pub fn facet(mut self) -> Self {
        self.facet = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    pub fields: Vec<CollectionField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sorting_field: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    #[serde(default)]
    pub num_documents: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TypesenseSearchParams<'a> {
    pub q: &'a str,
    pub query_by: &'a str,
    pub filter_by: Option<&'a str>,
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypesenseHit<T> {
    pub document: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypesenseSearchResponse<T> {
    #[serde(default)]
    pub found: u64,
    #[serde(default)]
    pub page: u64,
    pub hits: Vec<TypesenseHit<T>>,
}

/// One line of the JSONL body returned by the documents import endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportLineResult {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
