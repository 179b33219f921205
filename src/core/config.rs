//! Configuration management for the MCP server.
//!
//! Configuration comes from environment variables (with `.env` support via
//! dotenvy). The API-facing names (`API_BASE_URL`, `API_HEADERS`) are an
//! external contract shared with the generated catalog tooling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifying user agent, always appended last when parsing static headers.
const USER_AGENT: &str = concat!("hostinger-mcp-server/", env!("CARGO_PKG_VERSION"));

/// Default remote API base URL when `API_BASE_URL` is unset.
const DEFAULT_BASE_URL: &str = "https://developers.hostinger.com";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Remote API configuration.
    pub api: ApiConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Remote API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all tool paths are joined against.
    pub base_url: String,

    /// Static headers attached to every outbound request, including the
    /// server's own User-Agent.
    pub headers: BTreeMap<String, String>,

    /// Optional per-request timeout in seconds. The upstream design enforces
    /// none; this knob exists so operators can opt in.
    pub timeout_secs: Option<u64>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: parse_headers(""),
            timeout_secs: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "hostinger-api-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            api: ApiConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("API_BASE_URL") {
            config.api.base_url = base_url;
        }

        if let Ok(headers) = std::env::var("API_HEADERS") {
            config.api.headers = parse_headers(&headers);
        }

        if let Ok(secs) = std::env::var("API_TIMEOUT_SECS") {
            config.api.timeout_secs = secs.parse().ok();
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        } else if std::env::var("DEBUG").as_deref() == Ok("true") {
            config.logging.level = "debug".to_string();
        }

        config
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Parse a `KEY:VALUE[,KEY:VALUE...]` header string.
///
/// Malformed pairs are silently skipped. The identifying User-Agent is
/// inserted last so it cannot be overridden from configuration.
pub fn parse_headers(raw: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    for pair in raw.split(',') {
        if let Some((key, value)) = pair.split_once(':') {
            let key = key.trim();
            let value = value.trim();
            if !key.is_empty() && !value.is_empty() {
                headers.insert(key.to_string(), value.to_string());
            }
        }
    }

    headers.insert("User-Agent".to_string(), USER_AGENT.to_string());
    headers
}
