//! Dispatch-specific error types.
//!
//! Construction errors (unknown tool, unresolved path placeholder, bad URL)
//! are raised before any network I/O and are kept distinct from remote
//! failures so callers can tell a usage problem from a server problem.

use thiserror::Error;

/// Errors that can occur while dispatching a tool call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The requested tool name is not in the catalog.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// A `{placeholder}` in the path has no matching argument.
    #[error("Missing required path parameter '{placeholder}' for tool '{tool}'")]
    MissingPathParameter { tool: String, placeholder: String },

    /// The base URL or joined request URL could not be parsed.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// The HTTP call failed, either at the transport level (`status` is
    /// `None`) or with an error status. The upstream response body is
    /// preserved for diagnostics.
    #[error("API request failed{}: {detail}", status_suffix(.status))]
    RemoteCallFailed {
        status: Option<u16>,
        body: Option<serde_json::Value>,
        detail: String,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" with status {code}"),
        None => String::new(),
    }
}

impl DispatchError {
    /// Whether the error was raised before any network I/O.
    pub fn is_construction_error(&self) -> bool {
        !matches!(self, Self::RemoteCallFailed { .. })
    }
}
