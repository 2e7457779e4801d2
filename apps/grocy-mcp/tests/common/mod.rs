//! Shared fixtures: a mocked Grocy API and an in-memory MCP client.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code, clippy::unwrap_used, clippy::panic)]

use grocy_mcp::{GrocyClient, GrocyMcp};
use rmcp::{RoleClient, ServiceExt, service::RunningService};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";
pub const LIST_ID: u64 = 3;

pub type McpClient = RunningService<RoleClient, ()>;

/// Start a mock Grocy and a client pointed at its `/api` root.
pub async fn grocy() -> (MockServer, GrocyClient) {
    let server = MockServer::start().await;
    let client = GrocyClient::new(format!("{}/api", server.uri()), API_KEY);
    (server, client)
}

/// Serve `GrocyMcp` over an in-memory pipe and connect an MCP client to it.
pub async fn connect(client: GrocyClient) -> McpClient {
    let (server_io, client_io) = tokio::io::duplex(64 * 1024);
    let mcp = GrocyMcp::new(client, LIST_ID);
    tokio::spawn(async move {
        if let Ok(running) = mcp.serve(server_io).await {
            let _ = running.waiting().await;
        }
    });
    ().serve(client_io).await.unwrap()
}

/// Mock Grocy plus a connected MCP client.
pub async fn mcp() -> (MockServer, McpClient) {
    let (server, client) = grocy().await;
    let mcp = connect(client).await;
    (server, mcp)
}

/// Call a tool and return the raw protocol outcome.
pub async fn try_call(
    mcp: &McpClient,
    name: &str,
    arguments: Value,
) -> Result<Value, rmcp::service::ServiceError> {
    let request = serde_json::from_value(json!({ "name": name, "arguments": arguments })).unwrap();
    let result = mcp.call_tool(request).await?;
    Ok(serde_json::to_value(&result).unwrap())
}

/// Call a tool that must not fail at the protocol level.
pub async fn call(mcp: &McpClient, name: &str, arguments: Value) -> Value {
    try_call(mcp, name, arguments).await.unwrap()
}

pub fn is_error(result: &Value) -> bool {
    result["isError"].as_bool().unwrap_or(false)
}

/// Text of the single content block.
pub fn text(result: &Value) -> &str {
    result["content"][0]["text"].as_str().unwrap()
}

/// Parse the text of a JSON-rendered result.
pub fn body(result: &Value) -> Value {
    serde_json::from_str(text(result)).unwrap()
}
