//! Tool descriptor types.
//!
//! Descriptors are deserialized from the generated catalog JSON and are
//! immutable for the lifetime of the process.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// HTTP methods a catalog tool may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Canonical uppercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }

    /// Whether leftover arguments travel in a JSON body rather than the
    /// query string.
    pub fn has_body(self) -> bool {
        !matches!(self, Self::Get | Self::Delete)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One security requirement: scheme name mapped to its (unused) scope list.
///
/// This mirrors the OpenAPI `security` entry shape, e.g. `{"apiToken": []}`.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// A single callable remote operation from the catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Unique tool name, the dispatch key.
    pub name: String,

    /// Human-readable description shown to MCP clients.
    #[serde(default)]
    pub description: String,

    /// HTTP method of the remote operation.
    pub method: HttpMethod,

    /// URL path, possibly containing `{placeholder}` segments.
    pub path: String,

    /// JSON-schema-shaped parameter contract, passed through opaquely.
    pub input_schema: serde_json::Map<String, serde_json::Value>,

    /// Ordered security requirements; empty means no authentication.
    #[serde(default)]
    pub security: Vec<SecurityRequirement>,
}

impl ToolDescriptor {
    /// Names of the `required` parameters declared in the input schema.
    pub fn required_parameters(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(|v| v.as_array())
            .map(|names| names.iter().filter_map(|n| n.as_str()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_deserializes_uppercase() {
        let method: HttpMethod = serde_json::from_str("\"DELETE\"").unwrap();
        assert_eq!(method, HttpMethod::Delete);
    }

    #[test]
    fn test_method_body_split() {
        assert!(!HttpMethod::Get.has_body());
        assert!(!HttpMethod::Delete.has_body());
        assert!(HttpMethod::Post.has_body());
        assert!(HttpMethod::Put.has_body());
        assert!(HttpMethod::Patch.has_body());
    }

    #[test]
    fn test_descriptor_from_catalog_json() {
        let tool: ToolDescriptor = serde_json::from_value(serde_json::json!({
            "name": "VPS_getTemplateV1",
            "description": "Retrieves one OS template.",
            "method": "GET",
            "path": "/api/vps/v1/templates/{templateId}",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "templateId": { "type": "integer" }
                },
                "required": ["templateId"]
            },
            "security": [ { "apiToken": [] } ]
        }))
        .unwrap();

        assert_eq!(tool.method, HttpMethod::Get);
        assert_eq!(tool.required_parameters(), vec!["templateId"]);
        assert_eq!(tool.security.len(), 1);
        assert!(tool.security[0].contains_key("apiToken"));
    }

    #[test]
    fn test_descriptor_defaults() {
        let tool: ToolDescriptor = serde_json::from_value(serde_json::json!({
            "name": "ping",
            "method": "GET",
            "path": "/ping",
            "inputSchema": { "type": "object", "properties": {} }
        }))
        .unwrap();

        assert!(tool.description.is_empty());
        assert!(tool.security.is_empty());
        assert!(tool.required_parameters().is_empty());
    }
}
