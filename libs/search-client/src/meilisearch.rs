//! Meilisearch REST API client

use crate::error::{Error, Result};
use crate::models::{
    CreateIndexRequest, IndexInfo, MeiliErrorBody, MeiliSearchRequest, MeiliSearchResponse, Task,
    TaskInfo, TaskStatus,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Client for a single Meilisearch instance.
///
/// Index mutations in Meilisearch are asynchronous: every write returns a
/// [`TaskInfo`] that must be awaited with [`MeilisearchClient::wait_for_task`]
/// before the change is visible.
#[derive(Clone)]
pub struct MeilisearchClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    poll_interval: Duration,
}

impl MeilisearchClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Config("Meilisearch URL must not be empty".into()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Override the delay between task status polls.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// Fetch index metadata, or [`Error::IndexNotFound`] when it does not exist.
    pub async fn get_index(&self, uid: &str) -> Result<IndexInfo> {
        let path = format!("/indexes/{}", urlencoding::encode(uid));
        let response = self.request(Method::GET, &path).send().await?;
        let response = check(response, uid).await?;
        Ok(response.json().await?)
    }

    pub async fn create_index(&self, uid: &str, primary_key: Option<&str>) -> Result<TaskInfo> {
        let body = CreateIndexRequest { uid, primary_key };
        let response = self
            .request(Method::POST, "/indexes")
            .json(&body)
            .send()
            .await?;
        let response = check(response, uid).await?;
        Ok(response.json().await?)
    }

    pub async fn delete_index(&self, uid: &str) -> Result<TaskInfo> {
        let path = format!("/indexes/{}", urlencoding::encode(uid));
        let response = self.request(Method::DELETE, &path).send().await?;
        let response = check(response, uid).await?;
        Ok(response.json().await?)
    }

    pub async fn update_filterable_attributes(
        &self,
        uid: &str,
        attributes: &[&str],
    ) -> Result<TaskInfo> {
        self.update_setting(uid, "filterable-attributes", attributes)
            .await
    }

    pub async fn update_searchable_attributes(
        &self,
        uid: &str,
        attributes: &[&str],
    ) -> Result<TaskInfo> {
        self.update_setting(uid, "searchable-attributes", attributes)
            .await
    }

    async fn update_setting(&self, uid: &str, setting: &str, value: &[&str]) -> Result<TaskInfo> {
        let path = format!("/indexes/{}/settings/{}", urlencoding::encode(uid), setting);
        let response = self.request(Method::PUT, &path).json(value).send().await?;
        let response = check(response, uid).await?;
        Ok(response.json().await?)
    }

    /// Enqueue a batch of documents for indexing.
    ///
    /// The upload is bounded by `timeout` rather than the client default, as
    /// large batches can take longer to transfer than ordinary calls.
    pub async fn add_documents<T: Serialize>(
        &self,
        uid: &str,
        documents: &[T],
        primary_key: Option<&str>,
        timeout: Duration,
    ) -> Result<TaskInfo> {
        let path = format!("/indexes/{}/documents", urlencoding::encode(uid));
        let mut builder = self
            .request(Method::POST, &path)
            .json(documents)
            .timeout(timeout);
        if let Some(pk) = primary_key {
            builder = builder.query(&[("primaryKey", pk)]);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| upload_error(e, uid, timeout))?;
        let response = check(response, uid).await?;
        response
            .json()
            .await
            .map_err(|e| upload_error(e, uid, timeout))
    }

    pub async fn get_task(&self, task_uid: u64) -> Result<Task> {
        let path = format!("/tasks/{}", task_uid);
        let response = self.request(Method::GET, &path).send().await?;
        let response = check(response, "").await?;
        Ok(response.json().await?)
    }

    /// Poll a task until it reaches a terminal state or `timeout` elapses.
    ///
    /// Failed `index_already_exists` / `index_not_found` tasks map to
    /// [`Error::IndexAlreadyExists`] / [`Error::IndexNotFound`] so callers can
    /// treat a lost creation race or a redundant delete as success.
    pub async fn wait_for_task(&self, task: &TaskInfo, timeout: Duration) -> Result<Task> {
        let poll = async {
            loop {
                let current = self.get_task(task.task_uid).await?;
                if current.status.is_finished() {
                    return Ok::<Task, Error>(current);
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };

        let finished = tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| Error::TaskTimeout {
                operation: format!("Meilisearch task {} ({})", task.task_uid, task.task_type),
                waited: timeout,
            })??;

        match finished.status {
            TaskStatus::Succeeded => Ok(finished),
            _ => {
                let (code, message) = finished
                    .error
                    .as_ref()
                    .map(|e| (e.code.as_str(), e.message.clone()))
                    .unwrap_or(("", format!("task ended as {:?}", finished.status)));
                let index_uid = task.index_uid.clone().unwrap_or_default();
                match code {
                    "index_already_exists" => return Err(Error::IndexAlreadyExists(index_uid)),
                    "index_not_found" => return Err(Error::IndexNotFound(index_uid)),
                    _ => {}
                }
                Err(Error::TaskFailed {
                    task_uid: finished.uid,
                    message,
                })
            }
        }
    }

    pub async fn search<T: DeserializeOwned>(
        &self,
        uid: &str,
        request: &MeiliSearchRequest<'_>,
    ) -> Result<MeiliSearchResponse<T>> {
        let path = format!("/indexes/{}/search", urlencoding::encode(uid));
        let response = self
            .request(Method::POST, &path)
            .json(request)
            .send()
            .await?;
        let response = check(response, uid).await?;
        Ok(response.json().await?)
    }
}

fn upload_error(err: reqwest::Error, uid: &str, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::TaskTimeout {
            operation: format!("Meilisearch document upload into '{}'", uid),
            waited: timeout,
        }
    } else {
        Error::Http(err)
    }
}

/// Turn a non-success response into a typed error.
async fn check(response: Response, uid: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    Err(classify_error(status.as_u16(), &text, uid))
}

fn classify_error(status: u16, body: &str, uid: &str) -> Error {
    match serde_json::from_str::<MeiliErrorBody>(body) {
        Ok(err) if err.code == "index_not_found" => Error::IndexNotFound(uid.to_string()),
        Ok(err) if err.code == "index_already_exists" => {
            Error::IndexAlreadyExists(uid.to_string())
        }
        Ok(err) => Error::Api {
            status,
            code: err.code,
            message: err.message,
        },
        Err(_) if status == 404 => Error::IndexNotFound(uid.to_string()),
        Err(_) => Error::Api {
            status,
            code: "unknown".to_string(),
            message: body.to_string(),
        },
    }
}
