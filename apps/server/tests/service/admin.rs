use crate::support::*;
use axum::http::{Method, StatusCode};

async fn post_json(app: &TestApp, path: &str) -> anyhow::Result<(StatusCode, serde_json::Value)> {
    let (status, _, body) = app.request(Method::POST, path, None).await?;
    Ok((status, serde_json::from_slice(&body)?))
}

#[tokio::test]
async fn reindex_picks_up_rows_added_after_creation() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 2));
    let search = "/get-product-list/typesense?people=Men&category=Shirt";

    let (_, body) = app.get_json(search).await?;
    assert_eq!(body["total_items"], 2);

    app.store.insert(products("Men", "Shirt", 3));
    let (status, body) =
        post_json(&app, "/admin/reindex?backend=typesense&people=Men&category=Shirt").await?;
    assert_status(status, StatusCode::OK, "reindex");
    assert_eq!(body["status"], "success");
    assert_eq!(body["backend"], "typesense");
    assert_eq!(body["index"], "men-shirt");
    assert_eq!(body["documents"], 5);

    let (_, body) = app.get_json(search).await?;
    assert_eq!(body["total_items"], 5);
    assert_eq!(app.typesense.creations(), 2);
    Ok(())
}

#[tokio::test]
async fn reindex_builds_a_missing_index() -> anyhow::Result<()> {
    let app = TestApp::new(products("Women", "Jeans", 4));

    let (status, body) = post_json(&app, "/admin/reindex?category=Jeans").await?;
    assert_status(status, StatusCode::OK, "reindex absent index");
    assert_eq!(body["backend"], "meilisearch");
    assert_eq!(body["index"], "jeans");
    assert_eq!(app.meilisearch.index_names(), vec!["jeans".to_string()]);
    Ok(())
}

#[tokio::test]
async fn reindex_validates_its_parameters() -> anyhow::Result<()> {
    let app = TestApp::new(products("Women", "Jeans", 1));

    let (status, _) = post_json(&app, "/admin/reindex?backend=typesense").await?;
    assert_status(status, StatusCode::BAD_REQUEST, "missing category");

    let (status, _) = post_json(&app, "/admin/reindex?backend=solr&category=Jeans").await?;
    assert_status(status, StatusCode::BAD_REQUEST, "unknown backend");

    let (status, _) = post_json(&app, "/admin/reindex?category=Footwear").await?;
    assert_status(status, StatusCode::NOT_FOUND, "empty partition");
    Ok(())
}
