//! # Grocy MCP Server
//!
//! Entry point for the MCP (Model Context Protocol) bridge to Grocy.
//!
//! Reads configuration from an optional TOML file and the environment:
//! - `GROCY_BASE_URL`: Grocy API root (default: `http://grocy:80/api`;
//!   `GROCY_BASE_API` is accepted as a legacy name)
//! - `GROCY_API_KEY`: required API key
//! - `GROCY_SHOPPING_LIST_ID`: list targeted by list-writing tools (default: 1)
//!
//! Communicates with AI clients via MCP over stdio, and forwards requests to
//! the Grocy HTTP API.

use clap::Parser;
use grocy_mcp::{Config, GrocyClient, GrocyMcp};
use rmcp::{ServiceExt, transport::stdio};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Grocy MCP Server
///
/// Serves Grocy as MCP tools over stdio.
#[derive(Parser, Debug)]
#[command(name = "grocy-mcp")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file (keys: base_url, api_key, shopping_list_id)
    #[arg(short, long, env = "GROCY_MCP_CONFIG")]
    config: Option<PathBuf>,
}

/// Logging to stderr only; stdout is reserved for the MCP stdio transport.
/// GROCY_LOG_FORMAT=json enables machine-parseable output.
fn init_tracing() {
    let log_format = std::env::var("GROCY_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "grocy_mcp=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(false),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        base_url = %config.base_url,
        shopping_list_id = config.shopping_list_id,
        "Grocy MCP server starting"
    );

    if let Err(e) = serve(config).await {
        tracing::error!("MCP serve error: {e}");
        std::process::exit(1);
    }
}

async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = GrocyClient::from_config(&config);
    let mcp = GrocyMcp::new(client, config.shopping_list_id);

    let service = mcp.serve(stdio()).await?;
    service.waiting().await?;
    tracing::info!("Transport closed, shutting down");
    Ok(())
}
