use crate::support::*;
use axum::http::StatusCode;

#[tokio::test]
async fn empty_partition_is_not_found_every_time() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 3));
    let path = "/get-product-list/meilisearch?people=Boy&category=Footwear";

    for attempt in 0..2 {
        let (status, body) = app.get_json(path).await?;
        assert_status(status, StatusCode::NOT_FOUND, "empty partition");
        assert_eq!(body["status"], "error");
        assert_eq!(
            body["message"], "No products found for people='Boy' and category='Footwear'.",
            "attempt {attempt}"
        );
    }
    assert_eq!(app.meilisearch.creations(), 0);
    assert!(app.meilisearch.index_names().is_empty());
    Ok(())
}

#[tokio::test]
async fn index_is_created_once_and_reused() -> anyhow::Result<()> {
    let app = TestApp::new(products("Women", "Jeans", 6));
    let path = "/get-product-list/typesense?people=Women&category=Jeans";

    for _ in 0..3 {
        let (status, body) = app.get_json(path).await?;
        assert_status(status, StatusCode::OK, "repeat search");
        assert_eq!(body["total_items"], 6);
    }
    assert_eq!(app.typesense.creations(), 1);
    assert_eq!(app.typesense.index_names(), vec!["women-jeans".to_string()]);
    Ok(())
}

#[tokio::test]
async fn concurrent_first_requests_share_one_provisioning() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Footwear", 4));
    let path = "/get-product-list/meilisearch?people=Men&category=Footwear";

    let results = futures::future::join_all((0..8).map(|_| app.get_json(path))).await;
    for result in results {
        let (status, body) = result?;
        assert_status(status, StatusCode::OK, "concurrent search");
        assert_eq!(body["total_items"], 4);
    }
    assert_eq!(app.meilisearch.creations(), 1);
    Ok(())
}

#[tokio::test]
async fn partition_names_are_normalised() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 1));

    let (status, _) = app
        .get_json("/get-product-list/meilisearch?people=%20MEN%20&category=shirt")
        .await?;
    assert_status(status, StatusCode::OK, "mixed-case partition");
    assert_eq!(app.meilisearch.index_names(), vec!["men-shirt".to_string()]);
    Ok(())
}

#[tokio::test]
async fn people_match_as_a_prefix_and_category_as_a_substring() -> anyhow::Result<()> {
    let mut catalog = products("Men", "Shirt", 2);
    catalog.extend(products("Women", "Shirt", 3));
    catalog.extend(products("Men", "T-Shirt", 1));
    let app = TestApp::new(catalog);

    let (_, body) = app
        .get_json("/get-product-list/meilisearch?people=Men&category=Shirt")
        .await?;
    // "Women" does not start with "men"; "T-Shirt" contains "shirt".
    assert_eq!(body["total_items"], 3);
    Ok(())
}

#[tokio::test]
async fn existing_index_is_not_refreshed_by_new_rows() -> anyhow::Result<()> {
    let app = TestApp::new(products("Men", "Shirt", 2));
    let path = "/get-product-list/meilisearch?people=Men&category=Shirt";

    let (_, body) = app.get_json(path).await?;
    assert_eq!(body["total_items"], 2);

    app.store.insert(products("Men", "Shirt", 3));
    let (_, body) = app.get_json(path).await?;
    assert_eq!(body["total_items"], 2);
    assert_eq!(app.meilisearch.creations(), 1);
    Ok(())
}

#[tokio::test]
async fn look_alike_partitions_get_their_own_indexes() -> anyhow::Result<()> {
    let mut catalog = products("Men", "Shirt", 2);
    catalog.extend(products("Women", "Men Shirt", 1));
    let app = TestApp::new(catalog);

    let (status, body) = app
        .get_json("/get-product-list/meilisearch/v2?category=Men%20Shirt")
        .await?;
    assert_status(status, StatusCode::OK, "category-only partition");
    assert_eq!(body["total_items"], 1);

    let (status, body) = app
        .get_json("/get-product-list/meilisearch?people=Men&category=Shirt")
        .await?;
    assert_status(status, StatusCode::OK, "strict partition");
    assert_eq!(body["total_items"], 2);

    assert_eq!(app.meilisearch.creations(), 2);
    assert_eq!(app.meilisearch.index_names().len(), 2);
    Ok(())
}
