//! MCP Server implementation and lifecycle management.
//!
//! The handler surfaces the tool catalog over the MCP protocol: `tools/list`
//! is derived straight from the catalog, and `tools/call` goes through the
//! dispatch engine. Tools are data, so both handlers are implemented
//! directly instead of via the macro-based tool router.

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use tracing::{info, instrument};

use super::config::Config;
use crate::domains::catalog::ToolCatalog;
use crate::domains::dispatch::{DispatchEngine, DispatchError};

/// The main MCP server handler.
///
/// Holds only shared immutable state, so cloning one per transport session
/// is cheap and sessions cannot observe each other.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Engine executing tool calls against the remote API.
    engine: DispatchEngine,
}

impl McpServer {
    /// Create a new MCP server for the given configuration and catalog.
    pub fn new(config: Config, catalog: ToolCatalog) -> crate::core::Result<Self> {
        let config = Arc::new(config);
        let engine = DispatchEngine::new(Arc::new(catalog), config.api.clone())?;

        Ok(Self { config, engine })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Number of tools exposed to clients.
    pub fn tool_count(&self) -> usize {
        self.engine.catalog().len()
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Exposes the Hostinger public API as MCP tools. Call tools/list to discover \
                 the available operations."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        info!("Listing tools");
        let tools = self
            .engine
            .catalog()
            .iter()
            .map(|descriptor| {
                Tool::new(
                    Cow::Owned(descriptor.name.clone()),
                    Cow::Owned(descriptor.description.clone()),
                    Arc::new(descriptor.input_schema.clone()),
                )
            })
            .collect();

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        info!("Executing tool: {}", request.name);
        let arguments = request.arguments.unwrap_or_default();

        match self.engine.invoke(&request.name, arguments).await {
            Ok(payload) => {
                let text = serde_json::to_string(&payload)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(error @ DispatchError::RemoteCallFailed { .. }) => {
                let data = if let DispatchError::RemoteCallFailed { status, body, .. } = &error {
                    Some(serde_json::json!({ "status": status, "body": body }))
                } else {
                    None
                };
                Err(McpError::internal_error(error.to_string(), data))
            }
            // Construction errors: unknown tool, unresolved placeholder, bad URL.
            Err(error) => Err(McpError::invalid_params(error.to_string(), None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_exposes_builtin_catalog() {
        let catalog = ToolCatalog::builtin().unwrap();
        let expected = catalog.len();
        let server = McpServer::new(Config::default(), catalog).unwrap();
        assert_eq!(server.tool_count(), expected);
        assert_eq!(server.name(), "hostinger-api-mcp");
    }
}
