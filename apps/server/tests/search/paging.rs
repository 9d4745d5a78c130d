use crate::support::*;
use axum::http::StatusCode;

const STRICT: &str = "/get-product-list/meilisearch?people=Men&category=Shirt";

#[tokio::test]
async fn first_page_envelope_counts_every_match() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 25));

    let (status, body) = app.get_json(&format!("{STRICT}&page=1&page_size=10")).await?;
    assert_status(status, StatusCode::OK, "first page");
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 10);
    assert_eq!(body["total_items"], 25);
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(10));
    assert!(body["time"].as_f64().is_some());
    Ok(())
}

#[tokio::test]
async fn last_page_holds_the_remainder() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 25));

    let (status, body) = app.get_json(&format!("{STRICT}&page=3&page_size=10")).await?;
    assert_status(status, StatusCode::OK, "last page");
    assert_eq!(body["data"].as_array().map(Vec::len), Some(5));
    Ok(())
}

#[tokio::test]
async fn page_past_the_end_is_not_found() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 25));

    let (status, body) = app.get_json(&format!("{STRICT}&page=4&page_size=10")).await?;
    assert_status(status, StatusCode::NOT_FOUND, "page 4 of 3");
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Page 4 does not exist. Last page is 3.");
    Ok(())
}

#[tokio::test]
async fn defaults_apply_when_paging_is_omitted() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 12));

    let (status, body) = app.get_json(STRICT).await?;
    assert_status(status, StatusCode::OK, "default paging");
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 10);
    assert_eq!(body["total_pages"], 2);
    Ok(())
}

#[tokio::test]
async fn out_of_range_paging_is_rejected() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 3));

    for query in ["page=0", "page_size=0", "page_size=101", "page=abc", "page=-2"] {
        let (status, body) = app.get_json(&format!("{STRICT}&{query}")).await?;
        assert_status(status, StatusCode::BAD_REQUEST, query);
        assert_eq!(body["status"], "error", "{query}");
    }
    // Validation happens before any index is touched.
    assert_eq!(app.meilisearch.creations(), 0);
    Ok(())
}

#[tokio::test]
async fn configured_page_size_cap_is_enforced() -> anyhow::Result<()> {
    let app = TestApp::new_with_config(products("Men", "Shirt", 3), |config| {
        config.search.max_page_size = 5;
    });

    let (status, _) = app.get_json(&format!("{STRICT}&page_size=6")).await?;
    assert_status(status, StatusCode::BAD_REQUEST, "page_size above cap");
    let (status, _) = app.get_json(&format!("{STRICT}&page_size=5")).await?;
    assert_status(status, StatusCode::OK, "page_size at cap");
    Ok(())
}

#[tokio::test]
async fn no_text_matches_is_an_empty_single_page() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 4));

    let (status, body) = app
        .get_json(&format!("{STRICT}&search=velvet&page=2"))
        .await?;
    assert_status(status, StatusCode::OK, "empty result");
    assert_eq!(body["total_items"], 0);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["data"], serde_json::json!([]));
    Ok(())
}

#[tokio::test]
async fn largest_page_number_is_not_found() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 25));

    let (status, body) = app
        .get_json(&format!("{STRICT}&page={}&page_size=10", u64::MAX))
        .await?;
    assert_status(status, StatusCode::NOT_FOUND, "page u64::MAX");
    assert_eq!(
        body["message"],
        format!("Page {} does not exist. Last page is 3.", u64::MAX)
    );
    Ok(())
}

#[tokio::test]
async fn largest_page_number_of_an_empty_result_is_empty() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 2));

    let (status, body) = app
        .get_json(&format!("{STRICT}&search=velvet&page={}", u64::MAX))
        .await?;
    assert_status(status, StatusCode::OK, "deep page of no hits");
    assert_eq!(body["total_items"], 0);
    assert_eq!(body["data"], serde_json::json!([]));
    Ok(())
}
