//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (default for MCP).
    Stdio,

    /// HTTP server with SSE streaming and session-routed POST messages.
    Sse(SseConfig),
}

/// SSE transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8100
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::Stdio
    }
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl TransportConfig {
    /// Create a STDIO transport config.
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Create an SSE transport config.
    pub fn sse(host: impl Into<String>, port: u16) -> Self {
        Self::Sse(SseConfig {
            host: host.into(),
            port,
        })
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            Self::Sse(cfg) => format!("SSE on {}:{}", cfg.host, cfg.port),
        }
    }

    /// Check if this transport is the standard STDIO mode.
    pub fn is_stdio(&self) -> bool {
        matches!(self, Self::Stdio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stdio() {
        assert!(TransportConfig::default().is_stdio());
    }

    #[test]
    fn test_sse_description() {
        let config = TransportConfig::sse("0.0.0.0", 9000);
        assert_eq!(config.description(), "SSE on 0.0.0.0:9000");
        assert!(!config.is_stdio());
    }
}
