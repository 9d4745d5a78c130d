//! Prometheus metrics for the catalog service

use crate::config::BackendKind;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec,
    register_int_gauge_vec, HistogramVec, IntCounter, IntCounterVec, IntGaugeVec,
};
use std::time::Duration;

lazy_static! {
    // HTTP Request Metrics

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "catalog_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "catalog_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 120.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "catalog_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    /// Upload sizes matter for bulk import, so buckets reach into gigabytes.
    pub static ref HTTP_REQUEST_SIZE_BYTES: HistogramVec = register_histogram_vec!(
        "catalog_http_request_size_bytes",
        "HTTP request body size in bytes",
        &["method", "path"],
        vec![100.0, 10_000.0, 1_000_000.0, 10_000_000.0, 100_000_000.0, 1_000_000_000.0]
    )
    .expect("Failed to register HTTP_REQUEST_SIZE_BYTES");

    // Search Metrics

    /// Index provisioning attempts by outcome (created, empty, error)
    pub static ref INDEX_PROVISIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "catalog_index_provisions_total",
        "Total number of search index provisioning attempts",
        &["backend", "outcome"]
    )
    .expect("Failed to register INDEX_PROVISIONS_TOTAL");

    pub static ref INDEX_PROVISION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "catalog_index_provision_duration_seconds",
        "Search index provisioning duration in seconds",
        &["backend"],
        vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]
    )
    .expect("Failed to register INDEX_PROVISION_DURATION_SECONDS");

    pub static ref SEARCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        "catalog_search_total",
        "Total number of catalog searches",
        &["backend", "status"]
    )
    .expect("Failed to register SEARCH_TOTAL");

    pub static ref SEARCH_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "catalog_search_duration_seconds",
        "Catalog search duration in seconds, provisioning included",
        &["backend"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0, 30.0]
    )
    .expect("Failed to register SEARCH_DURATION_SECONDS");

    // Import Metrics

    pub static ref IMPORTED_ROWS_TOTAL: IntCounter = register_int_counter!(
        "catalog_imported_rows_total",
        "Total number of product rows written by bulk import"
    )
    .expect("Failed to register IMPORTED_ROWS_TOTAL");
}

pub fn record_provision(backend: BackendKind, outcome: &str, elapsed: Duration) {
    INDEX_PROVISIONS_TOTAL
        .with_label_values(&[backend.as_str(), outcome])
        .inc();
    INDEX_PROVISION_DURATION_SECONDS
        .with_label_values(&[backend.as_str()])
        .observe(elapsed.as_secs_f64());
}

pub fn record_search(backend: BackendKind, status: &str, elapsed: Duration) {
    SEARCH_TOTAL
        .with_label_values(&[backend.as_str(), status])
        .inc();
    SEARCH_DURATION_SECONDS
        .with_label_values(&[backend.as_str()])
        .observe(elapsed.as_secs_f64());
}

pub fn record_import(rows: u64) {
    IMPORTED_ROWS_TOTAL.inc_by(rows);
}

/// Normalize a request path into a low-cardinality metrics label.
///
/// Trailing slashes are dropped, id-like segments (numbers, UUIDs) become
/// `{id}` and anything deeper than three segments is cut off.
pub fn sanitize_path(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .take(3)
        .map(|s| if looks_like_id(s) { "{id}" } else { s })
        .collect();

    if segments.is_empty() {
        return "/".to_string();
    }
    format!("/{}", segments.join("/"))
}

fn looks_like_id(segment: &str) -> bool {
    segment.chars().all(|c| c.is_ascii_digit()) || uuid::Uuid::parse_str(segment).is_ok()
}
