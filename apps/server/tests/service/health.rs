use crate::support::*;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use tower::ServiceExt as _;

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let app = TestApp::new(Vec::new());

    let (status, body) = app.get_json("/health").await?;
    assert_status(status, StatusCode::OK, "health");
    assert_eq!(body["status"], "ok");

    let (status, body) = app.get_json("/").await?;
    assert_status(status, StatusCode::OK, "banner");
    assert_eq!(body["defaultBackend"], "meilisearch");
    Ok(())
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() -> anyhow::Result<()> {
    let app = TestApp::new(Vec::new());

    let (_, headers, _) = app.request(Method::GET, "/health", None).await?;
    assert!(headers.contains_key("x-request-id"));
    assert!(headers.contains_key("x-trace-id"));
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(!headers.contains_key("x-correlation-id"));
    Ok(())
}

#[tokio::test]
async fn client_request_id_is_echoed_as_correlation_id() -> anyhow::Result<()> {
    let app = TestApp::new(Vec::new());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header("x-request-id", "client-abc")
        .body(Body::empty())?;
    let response = app.router.clone().oneshot(request).await?;

    assert_eq!(response.headers()["x-correlation-id"], "client-abc");
    assert_ne!(response.headers()["x-request-id"], "client-abc");
    Ok(())
}

#[tokio::test]
async fn metrics_endpoint_exposes_catalog_series() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 1));
    app.get_json("/get-product-list/meilisearch?people=Men&category=Shirt")
        .await?;

    let (status, _, body) = app.request(Method::GET, "/metrics", None).await?;
    assert_status(status, StatusCode::OK, "metrics");
    let text = String::from_utf8(body.to_vec())?;
    assert!(text.contains("catalog_http_requests_total"));
    assert!(text.contains("catalog_search_total"));
    assert!(text.contains("catalog_index_provisions_total"));
    Ok(())
}
