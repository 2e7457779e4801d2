//! # Tool Handlers
//!
//! The body of every MCP tool, grouped by Grocy area. Handlers take the
//! client plus their typed parameters, run their backend calls in order and
//! return a [`ToolReply`]; the server module only wires them to names.
//!
//! - `stock` → stock levels, stock actions, product lookup and matching
//! - `entities` → generic `/objects/{entity}` CRUD
//! - `shopping` → shopping list reads, writes and bulk add
//! - `recipes` → recipe reads, creation with ingredients, shortfalls
//! - `household` → chores, tasks, batteries
//! - `system` → system info and user fields
//! - `brewing` → ingredient export for brewing software

pub mod brewing;
pub mod entities;
pub mod household;
pub mod recipes;
pub mod shopping;
pub mod stock;
pub mod system;

use crate::client::ClientError;
use grocy_core::GrocyError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Successful tool output.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolReply {
    /// A plain confirmation.
    Message(String),
    /// A payload, pretty-printed for the client.
    Json(Value),
}

impl ToolReply {
    /// Wrap any serializable payload.
    pub fn json<T: Serialize>(payload: &T) -> Result<Self, ToolError> {
        Ok(Self::Json(serde_json::to_value(payload)?))
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }

    /// Text sent back in the tool result.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Message(text) => text.clone(),
            Self::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// Why a tool call failed. Rendered into an error-flagged result, never a
/// protocol error.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Domain(#[from] GrocyError),

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ToolError {
    /// HTTP status Grocy answered with, when the failure came from Grocy.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client(e) => e.status(),
            _ => None,
        }
    }

    /// `Error: <message>`, plus the compact backend body on the next line
    /// when Grocy sent one.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Client(e) => match e.body() {
                Some(body) => format!("Error: {self}\n{body}"),
                None => format!("Error: {self}"),
            },
            _ => format!("Error: {self}"),
        }
    }
}

pub type ToolResult = Result<ToolReply, ToolError>;

// =============================================================================
// TESTS
// =============================================================================
