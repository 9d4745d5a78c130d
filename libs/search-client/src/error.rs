//! Error types for search-client

use std::time::Duration;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Search engine client errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Index already exists: {0}")]
    IndexAlreadyExists(String),

    #[error("Search engine returned {status}: {message} ({code})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Task {task_uid} failed: {message}")]
    TaskFailed { task_uid: u64, message: String },

    #[error("Timed out after {waited:?} waiting for {operation}")]
    TaskTimeout {
        operation: String,
        waited: Duration,
    },

    #[error("Document import rejected {failed} of {total} documents: {first_error}")]
    ImportRejected {
        failed: usize,
        total: usize,
        first_error: String,
    },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl Error {
    /// True for any failure that means the remote index does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::IndexNotFound(_))
    }

    /// True when the remote service refused a create because the index is already there.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::IndexAlreadyExists(_))
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            Error::TaskTimeout { .. } => true,
            Error::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
