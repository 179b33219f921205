//! MCP server for the Hostinger public API.
//!
//! Exposes the operations of the remote HTTP API as MCP tools, driven by a
//! registry generated from the upstream OpenAPI document.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server handler, and
//!   the transport layer (stdio and SSE)
//! - **domains**: business logic organized by bounded contexts
//!   - **catalog**: the generated tool registry and security schemes
//!   - **dispatch**: request construction, credential injection, and the
//!     engine performing the HTTP calls
//!
//! # Example
//!
//! ```rust,no_run
//! use hostinger_mcp_server::core::{Config, McpServer};
//! use hostinger_mcp_server::domains::catalog::ToolCatalog;
//!
//! # fn main() -> hostinger_mcp_server::Result<()> {
//! let config = Config::from_env();
//! let catalog = ToolCatalog::builtin()?;
//! let server = McpServer::new(config, catalog)?;
//! // Hand the server to a transport...
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use crate::core::{Config, Error, McpServer, Result};
