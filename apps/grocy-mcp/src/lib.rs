//! # grocy-mcp
//!
//! MCP bridge to a Grocy server - THE BRIDGE.
//!
//! ```text
//! MCP client ──stdio──▶ server (rmcp router) ──▶ tools ──▶ client (reqwest) ──▶ Grocy
//!                                                  │
//!                                                  ▼
//!                                             grocy-core
//! ```
//!
//! - `config` → layered configuration (defaults, TOML file, environment)
//! - `client` → typed Grocy REST calls and HTTP error mapping
//! - `params` → tool argument records and their JSON Schemas
//! - `tools` → tool handlers, one module per Grocy area
//! - `server` → the `rmcp` tool router and `ServerHandler`

pub mod client;
pub mod config;
pub mod params;
pub mod server;
pub mod tools;

pub use client::{ClientError, GrocyClient};
pub use config::{Config, ConfigError};
pub use server::GrocyMcp;
