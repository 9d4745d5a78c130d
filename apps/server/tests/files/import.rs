use crate::support::*;
use axum::http::{Method, StatusCode};
use std::sync::atomic::Ordering;

#[tokio::test]
async fn csv_upload_imports_every_row() -> anyhow::Result<()> {
    let app = TestApp::new(Vec::new());
    let csv = csv_body(&products("Women", "Shirt", 7))?;

    let (status, body) = app.upload("/bulk-import", "products.csv", &csv).await?;
    assert_status(status, StatusCode::OK, "csv import");
    assert_eq!(body["status"], "success");
    assert_eq!(body["imported_count"], 7);
    assert!(body["timeTaken_ms"].as_f64().is_some());
    assert!(body["processingTimeTaken_ms"].as_f64().is_some());
    assert_eq!(app.store.len(), 7);
    Ok(())
}

#[tokio::test]
async fn legacy_path_and_upper_case_extension_are_accepted() -> anyhow::Result<()> {
    let app = TestApp::new(Vec::new());
    let csv = csv_body(&products("Boy", "Jeans", 2))?;

    let (status, body) = app
        .upload("/bulk-product-import/v5", "PRODUCTS.CSV", &csv)
        .await?;
    assert_status(status, StatusCode::OK, "legacy import path");
    assert_eq!(body["imported_count"], 2);
    Ok(())
}

#[tokio::test]
async fn unsupported_extension_never_reaches_the_store() -> anyhow::Result<()> {
    let app = TestApp::new(Vec::new());

    let (status, body) = app.upload("/bulk-import", "products.json", b"[]").await?;
    assert_status(status, StatusCode::BAD_REQUEST, "json upload");
    assert_eq!(body["status"], "error");
    assert_eq!(
        body["message"],
        "Uploaded file can be of .csv or .xlsx type only"
    );
    assert_eq!(app.store.copies.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn wrong_column_count_is_rejected() -> anyhow::Result<()> {
    let app = TestApp::new(Vec::new());

    let (status, _) = app
        .upload("/bulk-import", "products.csv", b"product_id,name\n1,Shirt\n")
        .await?;
    assert_status(status, StatusCode::BAD_REQUEST, "short header");
    assert_eq!(app.store.copies.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn non_multipart_request_is_unsupported_media_type() -> anyhow::Result<()> {
    let app = TestApp::new(Vec::new());

    let (status, _, _) = app
        .request(Method::POST, "/bulk-import", Some("a,b".into()))
        .await?;
    assert_status(status, StatusCode::UNSUPPORTED_MEDIA_TYPE, "plain body");
    Ok(())
}

#[tokio::test]
async fn generated_spreadsheet_can_be_imported() -> anyhow::Result<()> {
    let app = TestApp::new(Vec::new());

    let (status, _, xlsx) = app
        .request(Method::GET, "/generate-dataset?rows=4&format=excel", None)
        .await?;
    assert_status(status, StatusCode::OK, "generate xlsx");

    let (status, body) = app.upload("/bulk-import", "dataset.xlsx", &xlsx).await?;
    assert_status(status, StatusCode::OK, "xlsx import");
    assert_eq!(body["imported_count"], 4);
    assert_eq!(app.store.len(), 4);
    Ok(())
}

#[tokio::test]
async fn imported_rows_become_searchable() -> anyhow::Result<()> {
    let app = TestApp::new(Vec::new());
    let csv = csv_body(&products("Girl", "Footwear", 12))?;
    app.upload("/bulk-import", "products.csv", &csv).await?;

    let (status, body) = app
        .get_json("/get-product-list/typesense?people=Girl&category=Footwear&page=2")
        .await?;
    assert_status(status, StatusCode::OK, "search after import");
    assert_eq!(body["total_items"], 12);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    Ok(())
}
