pub mod shared;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use catalog::{
    api::create_router, config::BackendKind, models::Product, search::SearchBackends, AppState,
    Config,
};
use std::sync::Arc;
use tower::ServiceExt as _;

pub use fakes::*;
pub use fixtures::*;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub meilisearch: Arc<InMemoryEngine>,
    pub typesense: Arc<InMemoryEngine>,
}

impl TestApp {
    pub fn new(products: Vec<Product>) -> Self {
        Self::new_with_config(products, |_| {})
    }

    pub fn new_with_config(products: Vec<Product>, configure: impl FnOnce(&mut Config)) -> Self {
        shared::init_tracing();

        let mut config = Config::default();
        configure(&mut config);

        let store = Arc::new(InMemoryStore::with_products(products));
        let meilisearch = Arc::new(InMemoryEngine::new(BackendKind::Meilisearch));
        let typesense = Arc::new(InMemoryEngine::new(BackendKind::Typesense));
        let backends = SearchBackends::new(
            meilisearch.clone(),
            typesense.clone(),
            config.search.default_backend,
        );

        let state = AppState::from_parts(config, store.clone(), backends);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            store,
            meilisearch,
            typesense,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("host", "example.org")
            .body(match body {
                Some(bytes) => Body::from(bytes),
                None => Body::empty(),
            })
            .context("build request")?;
        self.send(request).await
    }

    pub async fn get_json(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, serde_json::Value)> {
        let (status, _headers, body) = self.request(Method::GET, path_and_query, None).await?;
        let json = serde_json::from_slice(&body)
            .with_context(|| format!("decode JSON body: {}", String::from_utf8_lossy(&body)))?;
        Ok((status, json))
    }

    /// POST a single multipart field named `file`.
    pub async fn upload(
        &self,
        path: &str,
        filename: &str,
        contents: &[u8],
    ) -> anyhow::Result<(StatusCode, serde_json::Value)> {
        let boundary = "catalog-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header("host", "example.org")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .context("build multipart request")?;

        let (status, _headers, body) = self.send(request).await?;
        let json = serde_json::from_slice(&body)
            .with_context(|| format!("decode JSON body: {}", String::from_utf8_lossy(&body)))?;
        Ok((status, json))
    }

    async fn send(&self, request: Request<Body>) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }
}

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(actual, expected, "unexpected status for {context}");
}
