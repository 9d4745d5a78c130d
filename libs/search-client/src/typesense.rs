//! Typesense REST API client
//!
//! Unlike Meilisearch, Typesense applies collection and document writes
//! synchronously, so the request itself is the confirmation.

use crate::error::{Error, Result};
use crate::models::{
    CollectionInfo, CollectionSchema, ImportLineResult, TypesenseErrorBody,
    TypesenseSearchParams, TypesenseSearchResponse,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";

/// Client for a single Typesense node.
#[derive(Clone)]
pub struct TypesenseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TypesenseClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Config("Typesense URL must not be empty".into()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, &self.api_key)
    }

    /// Fetch collection metadata, or [`Error::IndexNotFound`] when it does not exist.
    pub async fn get_collection(&self, name: &str) -> Result<CollectionInfo> {
        let path = format!("/collections/{}", urlencoding::encode(name));
        let response = self.request(Method::GET, &path).send().await?;
        let response = check(response, name).await?;
        Ok(response.json().await?)
    }

    pub async fn create_collection(&self, schema: &CollectionSchema) -> Result<CollectionInfo> {
        let response = self
            .request(Method::POST, "/collections")
            .json(schema)
            .send()
            .await?;
        let response = check(response, &schema.name).await?;
        Ok(response.json().await?)
    }

    pub async fn delete_collection(&self, name: &str) -> Result<CollectionInfo> {
        let path = format!("/collections/{}", urlencoding::encode(name));
        let response = self.request(Method::DELETE, &path).send().await?;
        let response = check(response, name).await?;
        Ok(response.json().await?)
    }

    /// Import documents as JSONL.
    ///
    /// `action` is one of Typesense's import actions (`create`, `upsert`,
    /// `update`, `emplace`).
    ///
    /// Typesense answers 200 even when individual documents are rejected; the
    /// per-line results are inspected and any rejection fails the whole import.
    /// The request is bounded by `timeout`.
    pub async fn import_documents<T: Serialize>(
        &self,
        name: &str,
        documents: &[T],
        action: &str,
        timeout: Duration,
    ) -> Result<usize> {
        let body = to_jsonl(documents)?;
        let path = format!(
            "/collections/{}/documents/import",
            urlencoding::encode(name)
        );

        let response = self
            .request(Method::POST, &path)
            .query(&[("action", action)])
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .timeout(timeout)
            .body(body)
            .send()
            .await
            .map_err(|e| timeout_or_http(e, name, timeout))?;
        let response = check(response, name).await?;
        let text = response
            .text()
            .await
            .map_err(|e| timeout_or_http(e, name, timeout))?;

        summarize_import(&text, documents.len())
    }

    pub async fn search<T: DeserializeOwned>(
        &self,
        name: &str,
        params: &TypesenseSearchParams<'_>,
    ) -> Result<TypesenseSearchResponse<T>> {
        let path = format!(
            "/collections/{}/documents/search",
            urlencoding::encode(name)
        );
        let mut query: Vec<(&str, String)> = vec![
            ("q", params.q.to_string()),
            ("query_by", params.query_by.to_string()),
            ("page", params.page.to_string()),
            ("per_page", params.per_page.to_string()),
        ];
        if let Some(filter_by) = params.filter_by {
            query.push(("filter_by", filter_by.to_string()));
        }

        let response = self.request(Method::GET, &path).query(&query).send().await?;
        let response = check(response, name).await?;
        Ok(response.json().await?)
    }
}

fn to_jsonl<T: Serialize>(documents: &[T]) -> Result<String> {
    let mut body = String::new();
    for doc in documents {
        body.push_str(&serde_json::to_string(doc)?);
        body.push('\n');
    }
    Ok(body)
}

fn summarize_import(text: &str, total: usize) -> Result<usize> {
    let mut imported = 0usize;
    let mut failed = 0usize;
    let mut first_error = None;

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let result: ImportLineResult = serde_json::from_str(line)?;
        if result.success {
            imported += 1;
        } else {
            failed += 1;
            if first_error.is_none() {
                first_error = result.error;
            }
        }
    }

    if failed > 0 {
        return Err(Error::ImportRejected {
            failed,
            total,
            first_error: first_error.unwrap_or_else(|| "unknown error".to_string()),
        });
    }
    Ok(imported)
}

fn timeout_or_http(err: reqwest::Error, name: &str, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::TaskTimeout {
            operation: format!("Typesense document import into '{}'", name),
            waited: timeout,
        }
    } else {
        Error::Http(err)
    }
}

async fn check(response: Response, name: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    Err(classify_error(status.as_u16(), &text, name))
}

fn classify_error(status: u16, body: &str, name: &str) -> Error {
    match status {
        404 => Error::IndexNotFound(name.to_string()),
        409 => Error::IndexAlreadyExists(name.to_string()),
        _ => {
            let message = serde_json::from_str::<TypesenseErrorBody>(body)
                .map(|e| e.message)
                .unwrap_or_else(|_| body.to_string());
            Error::Api {
                status,
                code: "typesense_error".to_string(),
                message,
            }
        }
    }
}
