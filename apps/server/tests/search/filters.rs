use crate::support::*;
use axum::http::{Method, StatusCode};
use catalog::config::BackendKind;

fn prices(body: &serde_json::Value) -> Vec<f64> {
    let mut prices: Vec<f64> = body["data"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|d| d["price"].as_f64())
        .collect();
    prices.sort_by(|a, b| a.total_cmp(b));
    prices
}

#[tokio::test]
async fn strict_variant_requires_people_and_category() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 3));

    for path in [
        "/get-product-list/typesense?category=Shirt",
        "/get-product-list/typesense?people=Men",
        "/get-product-list/meilisearch",
    ] {
        let (status, body) = app.get_json(path).await?;
        assert_status(status, StatusCode::BAD_REQUEST, path);
        assert_eq!(
            body["message"],
            "Both 'people' and 'category' parameters are required."
        );
    }
    Ok(())
}

#[tokio::test]
async fn category_variant_requires_category() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 3));

    let (status, body) = app.get_json("/get-product-list/meilisearch/v2?people=Men").await?;
    assert_status(status, StatusCode::BAD_REQUEST, "missing category");
    assert_eq!(body["message"], "'category' parameter is required.");
    Ok(())
}

#[tokio::test]
async fn category_variant_filters_people_inside_one_index() -> anyhow::Result<()> {
    let mut catalog = products("Men", "Shirt", 3);
    catalog.extend(products("Women", "Shirt", 2));
    let app = TestApp::new(catalog);

    let (status, body) = app
        .get_json("/get-product-list/typesense/v2?category=Shirt&people=Women")
        .await?;
    assert_status(status, StatusCode::OK, "people filter");
    assert_eq!(body["total_items"], 2);
    for doc in body["data"].as_array().into_iter().flatten() {
        assert_eq!(doc["people"], "Women");
    }

    let (_, body) = app.get_json("/get-product-list/typesense/v2?category=Shirt").await?;
    assert_eq!(body["total_items"], 5);

    assert_eq!(app.typesense.index_names(), vec!["shirt".to_string()]);
    assert_eq!(app.typesense.creations(), 1);
    Ok(())
}

#[tokio::test]
async fn min_price_and_people_are_and_combined() -> anyhow::Result<()> {
    let mut catalog = products("Men", "Jeans", 3); // 10, 20, 30
    catalog.extend(products("Women", "Jeans", 3));
    let app = TestApp::new(catalog);

    let (status, body) = app
        .get_json("/get-product-list/meilisearch/v2?category=Jeans&people=Men&min_price=15")
        .await?;
    assert_status(status, StatusCode::OK, "combined filters");
    assert_eq!(body["total_items"], 2);
    assert_eq!(prices(&body), vec![20.0, 30.0]);

    let (_, body) = app
        .get_json("/get-product-list/meilisearch/v2?category=Jeans&min_price=30")
        .await?;
    assert_eq!(body["total_items"], 2, "lower bound is inclusive");
    Ok(())
}

#[tokio::test]
async fn negative_min_price_is_rejected() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Jeans", 3));

    let (status, _) = app
        .get_json("/get-product-list/meilisearch/v2?category=Jeans&min_price=-1")
        .await?;
    assert_status(status, StatusCode::BAD_REQUEST, "negative min_price");
    Ok(())
}

#[tokio::test]
async fn free_text_narrows_results() -> anyhow::Result<()> {
    let mut catalog = products("Girl", "Footwear", 2);
    let mut pink = product("Girl", "Footwear", 55.0);
    pink.name = "Pink Footwear".to_string();
    pink.manufacturer = "Puma".to_string();
    catalog.push(pink);
    let app = TestApp::new(catalog);

    let (_, body) = app
        .get_json("/get-product-list/typesense?people=Girl&category=Footwear&search=puma")
        .await?;
    assert_eq!(body["total_items"], 1);
    assert_eq!(body["data"][0]["name"], "Pink Footwear");

    let (_, body) = app
        .get_json("/get-product-list/typesense?people=Girl&category=Footwear&search=%20%20")
        .await?;
    assert_eq!(body["total_items"], 3, "blank text matches everything");
    Ok(())
}

#[tokio::test]
async fn product_search_uses_configured_default_backend() -> anyhow::Result<()> {
    let app = TestApp::new(products("Boy", "Shirt", 2));
    let (status, _) = app.get_json("/product-search?category=Shirt").await?;
    assert_status(status, StatusCode::OK, "default backend");
    assert_eq!(app.meilisearch.creations(), 1);
    assert_eq!(app.typesense.creations(), 0);

    let app = TestApp::new_with_config(products("Boy", "Shirt", 2), |config| {
        config.search.default_backend = BackendKind::Typesense;
    });
    let (status, _, _) = app
        .request(Method::POST, "/product-search?category=Shirt", None)
        .await?;
    assert_status(status, StatusCode::OK, "POST on typesense default");
    assert_eq!(app.meilisearch.creations(), 0);
    assert_eq!(app.typesense.creations(), 1);
    Ok(())
}
