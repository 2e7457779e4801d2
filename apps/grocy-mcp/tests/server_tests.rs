//! Protocol-level tests for the MCP server: catalog, argument decoding and
//! how backend failures are surfaced.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

mod common;

use common::{call, is_error, mcp, text, try_call};
use serde_json::json;
use std::collections::BTreeSet;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

const TOOLS: [&str; 44] = [
    "get_stock",
    "get_volatile_stock",
    "get_product_details",
    "add_product",
    "consume_product",
    "transfer_product",
    "inventory_product",
    "open_product",
    "get_product_by_barcode",
    "get_products",
    "search_products",
    "get_product_entries",
    "get_locations",
    "create_entity",
    "update_entity",
    "delete_entity",
    "get_entity",
    "get_shopping_list",
    "add_to_shopping_list",
    "remove_from_shopping_list",
    "add_missing_products_to_shopping_list",
    "add_expired_products_to_shopping_list",
    "clear_shopping_list",
    "get_recipes",
    "get_recipe_fulfillment",
    "consume_recipe",
    "add_recipe_to_shopping_list",
    "get_chores",
    "get_chore_details",
    "execute_chore",
    "get_tasks",
    "complete_task",
    "get_batteries",
    "get_battery_details",
    "charge_battery",
    "get_system_info",
    "get_userfields",
    "create_recipe_with_ingredients",
    "add_recipe_missing_to_shopping_list",
    "match_product_by_name",
    "bulk_get_stock",
    "get_recipe_with_stock_status",
    "bulk_add_to_shopping_list",
    "list_brewing_ingredients",
];

// =============================================================================
// CATALOG
// =============================================================================

#[tokio::test]
async fn test_lists_every_tool() {
    let (_server, mcp) = mcp().await;
    let tools = mcp.list_all_tools().await.unwrap();

    let names: BTreeSet<String> = tools.iter().map(|t| t.name.to_string()).collect();
    let expected: BTreeSet<String> = TOOLS.iter().map(ToString::to_string).collect();
    assert_eq!(tools.len(), 44);
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_tools_carry_descriptions_and_schemas() {
    let (_server, mcp) = mcp().await;
    let tools = mcp.list_all_tools().await.unwrap();

    for tool in &tools {
        assert!(
            tool.description.as_deref().is_some_and(|d| !d.is_empty()),
            "{} has no description",
            tool.name
        );
    }

    let add = tools.iter().find(|t| t.name == "add_product").unwrap();
    let schema = serde_json::to_value(add.input_schema.as_ref()).unwrap();
    let required: BTreeSet<&str> = schema["required"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(required.contains("product_id"));
    assert!(required.contains("amount"));
    assert!(!required.contains("price"));
}

#[tokio::test]
async fn test_server_advertises_tools() {
    let (_server, mcp) = mcp().await;
    let info = mcp.peer_info().unwrap();
    assert!(info.capabilities.tools.is_some());
    assert!(info.instructions.as_deref().unwrap().contains("Grocy"));
}

// =============================================================================
// ARGUMENT DECODING
// =============================================================================

#[tokio::test]
async fn test_unknown_tool_is_protocol_error() {
    let (_server, mcp) = mcp().await;
    assert!(try_call(&mcp, "make_coffee", json!({})).await.is_err());
}

#[tokio::test]
async fn test_missing_required_argument_is_protocol_error() {
    let (server, mcp) = mcp().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(
        try_call(&mcp, "get_product_details", json!({}))
            .await
            .is_err()
    );
    assert!(
        try_call(&mcp, "get_product_details", json!({ "product_id": "seven" }))
            .await
            .is_err()
    );
}

// =============================================================================
// BACKEND FAILURES
// =============================================================================

#[tokio::test]
async fn test_backend_error_is_flagged_result_with_body() {
    let (server, mcp) = mcp().await;
    Mock::given(method("GET"))
        .and(path("/api/stock/products/99"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error_message": "Product does not exist" })),
        )
        .mount(&server)
        .await;

    let result = call(&mcp, "get_product_details", json!({ "product_id": 99 })).await;
    assert!(is_error(&result));
    assert_eq!(
        text(&result),
        "Error: Request failed with status code 400: Product does not exist\n\
         {\"error_message\":\"Product does not exist\"}"
    );
}

#[tokio::test]
async fn test_bad_api_key_is_flagged_result() {
    let (server, mcp) = mcp().await;
    Mock::given(method("GET"))
        .and(path("/api/objects/tasks"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = call(&mcp, "get_tasks", json!({})).await;
    assert!(is_error(&result));
    assert!(text(&result).starts_with("Error: Unauthorized"));
}

#[tokio::test]
async fn test_session_survives_failed_call() {
    let (server, mcp) = mcp().await;
    Mock::given(method("GET"))
        .and(path("/api/objects/batteries"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/system/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "os": "linux" })))
        .mount(&server)
        .await;

    assert!(is_error(&call(&mcp, "get_batteries", json!({})).await));
    let info = call(&mcp, "get_system_info", json!({})).await;
    assert!(!is_error(&info));
    assert!(text(&info).contains("linux"));
}

// =============================================================================
// ENTITIES AND HOUSEHOLD
// =============================================================================

#[tokio::test]
async fn test_invalid_entity_name_never_reaches_grocy() {
    let (server, mcp) = mcp().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = call(
        &mcp,
        "get_entity",
        json!({ "entity": "../system", "object_id": 1 }),
    )
    .await;
    assert!(is_error(&result));
    assert!(text(&result).contains("invalid entity name"));
}

#[tokio::test]
async fn test_create_entity_reports_new_id() {
    let (server, mcp) = mcp().await;
    Mock::given(method("POST"))
        .and(path("/api/objects/locations"))
        .and(body_json(json!({ "name": "Cellar" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "created_object_id": "12" })))
        .expect(1)
        .mount(&server)
        .await;

    let result = call(
        &mcp,
        "create_entity",
        json!({ "entity": "locations", "data": { "name": "Cellar" } }),
    )
    .await;
    assert!(text(&result).starts_with("Successfully created locations with ID: 12\n"));
}

#[tokio::test]
async fn test_execute_chore_omits_empty_tracked_time() {
    let (server, mcp) = mcp().await;
    Mock::given(method("POST"))
        .and(path("/api/chores/4/execute"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 100 })))
        .expect(1)
        .mount(&server)
        .await;

    let result = call(
        &mcp,
        "execute_chore",
        json!({ "chore_id": 4, "tracked_time": "" }),
    )
    .await;
    assert_eq!(text(&result), "Successfully executed chore 4");
}
