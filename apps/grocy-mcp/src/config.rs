//! # Configuration
//!
//! Resolved once at startup, immutable afterwards. Later layers win:
//!
//! 1. built-in defaults
//! 2. optional TOML file (`--config` / `GROCY_MCP_CONFIG`)
//! 3. environment: `GROCY_BASE_URL` (or legacy `GROCY_BASE_API`),
//!    `GROCY_API_KEY`, `GROCY_SHOPPING_LIST_ID`
//!
//! Empty values count as unset at every layer.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://grocy:80/api";

/// Shopping list that list-writing tools target by default.
pub const DEFAULT_SHOPPING_LIST_ID: u64 = 1;

/// Errors that stop the process before it serves anything.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GROCY_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid GROCY_SHOPPING_LIST_ID {0:?}: expected a positive integer")]
    InvalidShoppingListId(String),
}

/// Keys accepted in the TOML config file. All optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub shopping_list_id: Option<u64>,
}

impl FileConfig {
    /// Read and parse a TOML config file.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolved configuration.
#[derive(Clone)]
pub struct Config {
    /// Grocy API root, without a trailing `/`.
    pub base_url: String,
    pub api_key: String,
    pub shopping_list_id: u64,
}

// The API key stays out of logs and panics.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("shopping_list_id", &self.shopping_list_id)
            .finish()
    }
}

impl Config {
    /// Load from an optional file plus the process environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match file {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge `file` with variables looked up through `env`.
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let base_url = var("GROCY_BASE_URL")
            .or_else(|| var("GROCY_BASE_API"))
            .or_else(|| non_empty(file.base_url))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = normalize_base_url(&base_url)?;

        let api_key = var("GROCY_API_KEY")
            .or_else(|| non_empty(file.api_key))
            .ok_or(ConfigError::MissingApiKey)?;

        let shopping_list_id = match var("GROCY_SHOPPING_LIST_ID") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or(ConfigError::InvalidShoppingListId(raw))?,
            None => file.shopping_list_id.unwrap_or(DEFAULT_SHOPPING_LIST_ID),
        };

        Ok(Self {
            base_url,
            api_key,
            shopping_list_id,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Check the URL parses and drop trailing slashes so paths can be appended.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(trimmed.to_string())
}

// =============================================================================
// TESTS
// =============================================================================
