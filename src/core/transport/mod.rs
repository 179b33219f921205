//! Transport layer for the MCP server.
//!
//! Two transports are supported, mutually exclusive per process:
//! - **STDIO**: standard input/output, the default MCP mode; one implicit
//!   session for the lifetime of the process.
//! - **SSE**: HTTP server streaming server-sent events, multiplexing any
//!   number of concurrent client sessions keyed by session id.
//!
//! Each transport handles the connection lifecycle and delegates message
//! processing to the MCP server handler.

mod config;
mod error;
mod service;

pub mod sse;
pub mod stdio;

pub use config::{SseConfig, TransportConfig};
pub use error::{TransportError, TransportResult};
pub use service::TransportService;
