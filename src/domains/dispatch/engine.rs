//! Dispatch engine - resolves a tool call into one HTTP request/response.
//!
//! Orchestrates catalog lookup, request construction, credential injection,
//! and the HTTP call itself. Exactly one attempt per invocation; failures are
//! never retried at this layer.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::core::config::ApiConfig;
use crate::domains::catalog::ToolCatalog;

use super::error::DispatchError;
use super::request::{ArgumentBag, OutboundRequest};
use super::security;

/// Executes tool calls against the remote API.
///
/// The engine holds only immutable state and a connection pool, so it is
/// cheap to share and places no bound on concurrently in-flight calls.
#[derive(Clone)]
pub struct DispatchEngine {
    catalog: Arc<ToolCatalog>,
    api: ApiConfig,
    client: reqwest::Client,
}

impl DispatchEngine {
    /// Create an engine for the given catalog and API configuration.
    pub fn new(catalog: Arc<ToolCatalog>, api: ApiConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = api.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            catalog,
            api,
            client,
        })
    }

    /// The catalog this engine dispatches against.
    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Resolve `name` in the catalog, build and execute the HTTP call, and
    /// return the decoded response payload.
    ///
    /// Construction errors (unknown tool, unresolved placeholder) surface
    /// before any I/O. Remote failures carry the upstream status code and
    /// response body.
    #[instrument(skip_all, fields(tool = %name))]
    pub async fn invoke(&self, name: &str, args: ArgumentBag) -> Result<Value, DispatchError> {
        let tool = self
            .catalog
            .get(name)
            .ok_or_else(|| DispatchError::ToolNotFound(name.to_string()))?;

        let mut request = OutboundRequest::build(tool, &args, &self.api.base_url)?;

        // Static headers from configuration sit underneath whatever the
        // builder already set (Content-Type in particular).
        for (key, value) in &self.api.headers {
            request
                .headers
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }

        security::apply(&self.catalog, &tool.security, &mut request);

        debug!("API Request: {} {}", request.method, request.url);
        self.execute(request).await
    }

    async fn execute(&self, request: OutboundRequest) -> Result<Value, DispatchError> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.clone());

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!("API request failed: {}", e);
            DispatchError::RemoteCallFailed {
                status: None,
                body: None,
                detail: e.to_string(),
            }
        })?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status.is_success() {
            // A body that dies mid-read is a transport failure, not a result.
            let payload = decode_payload(response).await.map_err(|e| {
                error!("Failed to read response body: {}", e);
                DispatchError::RemoteCallFailed {
                    status: None,
                    body: None,
                    detail: e.to_string(),
                }
            })?;
            info!("API Request: {} {} -> {}", request.method, request.url, status);
            Ok(payload)
        } else {
            error!(
                "API Request: {} {} -> {} (error)",
                request.method, request.url, status
            );
            let reason = status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string();
            // The status already tells the story; a body lost mid-read only
            // degrades the diagnostics.
            let (body, detail) = match decode_payload(response).await {
                Ok(payload) => (Some(payload), reason),
                Err(e) => (None, format!("{reason} (response body unreadable: {e})")),
            };
            Err(DispatchError::RemoteCallFailed {
                status: Some(status.as_u16()),
                body,
                detail,
            })
        }
    }
}

/// Decode the response body. JSON is returned verbatim; non-JSON text comes
/// back as a JSON string and an empty body becomes null.
async fn decode_payload(response: reqwest::Response) -> Result<Value, reqwest::Error> {
    let text = response.text().await?;
    if text.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::catalog::ToolCatalog;

    fn engine() -> DispatchEngine {
        let catalog = Arc::new(ToolCatalog::builtin().unwrap());
        DispatchEngine::new(catalog, ApiConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_tool_fails_before_io() {
        let result = engine().invoke("no_such_tool", Default::default()).await;
        assert!(matches!(result, Err(DispatchError::ToolNotFound(name)) if name == "no_such_tool"));
    }

    #[tokio::test]
    async fn test_missing_path_parameter_fails_before_io() {
        // virtualMachineId is a path placeholder for this tool.
        let result = engine()
            .invoke("VPS_getVirtualMachineV1", Default::default())
            .await;
        assert!(matches!(
            result,
            Err(DispatchError::MissingPathParameter { placeholder, .. }) if placeholder == "virtualMachineId"
        ));
    }
}
