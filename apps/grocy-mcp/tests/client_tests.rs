//! Integration tests for the Grocy HTTP client.
//!
//! Uses wiremock to stand in for a Grocy instance.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

mod common;

use common::{API_KEY, grocy};
use grocy_mcp::{ClientError, GrocyClient};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_sends_api_key_header() {
    let (server, client) = grocy().await;
    Mock::given(method("GET"))
        .and(path("/api/system/info"))
        .and(header("GROCY-API-KEY", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "grocy_version": { "Version": "4.2.0" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let info = client.system_info().await.unwrap();
    assert_eq!(info["grocy_version"]["Version"], "4.2.0");
}

#[tokio::test]
async fn test_no_content_yields_null() {
    let (server, client) = grocy().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/5/complete"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.complete_task(5).await.unwrap(), Value::Null);
}

#[tokio::test]
async fn test_error_message_from_body() {
    let (server, client) = grocy().await;
    Mock::given(method("GET"))
        .and(path("/api/stock/products/99"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error_message": "Product does not exist" })),
        )
        .mount(&server)
        .await;

    let err = client.product_details(99).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Request failed with status code 400: Product does not exist"
    );
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.body(),
        Some(&json!({ "error_message": "Product does not exist" }))
    );
}

#[tokio::test]
async fn test_error_without_body_uses_reason_phrase() {
    let (server, client) = grocy().await;
    Mock::given(method("GET"))
        .and(path("/api/objects/chores"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.chores().await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 500, .. }));
    assert!(err.to_string().contains("Internal Server Error"));
    assert!(err.body().is_none());
}

#[tokio::test]
async fn test_unauthorized() {
    let (server, client) = grocy().await;
    Mock::given(method("GET"))
        .and(path("/api/stock"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.stock().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized { .. }));
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_connection_failure() {
    // Nothing listens on port 1.
    let client = GrocyClient::new("http://127.0.0.1:1/api", API_KEY);
    let err = client.stock().await.unwrap_err();
    assert!(matches!(err, ClientError::ConnectionFailed { .. }));
    assert!(err.status().is_none());
}

#[tokio::test]
async fn test_barcode_is_one_escaped_segment() {
    let (server, client) = grocy().await;
    Mock::given(method("GET"))
        .and(path("/api/stock/products/by-barcode/40%2F12%203"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "product": { "id": 4 } })))
        .expect(1)
        .mount(&server)
        .await;

    let found = client.product_by_barcode("40/12 3").await.unwrap();
    assert_eq!(found["product"]["id"], 4);
}

#[tokio::test]
async fn test_shopping_list_actions_send_list_id() {
    let (server, client) = grocy().await;
    for endpoint in [
        "/api/stock/shoppinglist/add-missing-products",
        "/api/stock/shoppinglist/add-expired-products",
        "/api/stock/shoppinglist/clear",
    ] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(body_json(json!({ "list_id": 4 })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }

    client.add_missing_products(4).await.unwrap();
    client.add_expired_products(4).await.unwrap();
    client.clear_shopping_list(4).await.unwrap();
}

#[tokio::test]
async fn test_missing_recipe_is_none() {
    let (server, client) = grocy().await;
    Mock::given(method("GET"))
        .and(path("/api/objects/recipes/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/objects/recipes/9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "9", "name": "Pancakes" })),
        )
        .mount(&server)
        .await;

    assert!(client.recipe(8).await.unwrap().is_none());
    let recipe = client.recipe(9).await.unwrap().unwrap();
    assert_eq!(recipe.id, 9);
    assert_eq!(recipe.name, "Pancakes");
}

#[tokio::test]
async fn test_stock_levels_accept_string_numbers() {
    let (server, client) = grocy().await;
    Mock::given(method("GET"))
        .and(path("/api/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "product_id": "2", "amount": "1.5", "amount_aggregated": "2.5" },
            { "product_id": 3, "amount": 4, "amount_aggregated": 4 }
        ])))
        .mount(&server)
        .await;

    let levels = client.stock_levels().await.unwrap();
    assert_eq!(levels.aggregated(2), 2.5);
    assert_eq!(levels.aggregated(3), 4.0);
    assert_eq!(levels.aggregated(99), 0.0);
}

#[tokio::test]
async fn test_malformed_success_body_is_parse_error() {
    let (server, client) = grocy().await;
    Mock::given(method("GET"))
        .and(path("/api/objects/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client.products().await.unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
}
