//! Outbound request construction.
//!
//! Turns a tool descriptor plus a caller-supplied argument bag into a fully
//! specified HTTP request: path placeholders substituted, base URL joined,
//! and the leftover arguments routed to either the query string or a JSON
//! body depending on the method.

use std::collections::BTreeMap;

use serde_json::Value;
use url::Url;

use crate::domains::catalog::{HttpMethod, ToolDescriptor};

use super::error::DispatchError;

/// Argument bag supplied by the caller, one per invocation.
pub type ArgumentBag = serde_json::Map<String, Value>;

/// A fully specified outbound HTTP request.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl OutboundRequest {
    /// Build a request from a tool descriptor and an argument bag.
    ///
    /// The caller's bag is not mutated; a working copy is consumed instead.
    /// Arguments matching a `{placeholder}` in the path are substituted
    /// (percent-encoded) and removed so they are never duplicated into the
    /// query or body. Any placeholder still unresolved afterwards is a fatal
    /// construction error, raised before any I/O.
    pub fn build(
        tool: &ToolDescriptor,
        args: &ArgumentBag,
        base_url: &str,
    ) -> Result<Self, DispatchError> {
        let mut remaining = args.clone();
        let mut path = tool.path.clone();

        let path_keys: Vec<String> = remaining
            .keys()
            .filter(|key| path.contains(&format!("{{{key}}}")))
            .cloned()
            .collect();
        for key in path_keys {
            if let Some(value) = remaining.remove(&key) {
                let encoded = urlencoding::encode(&value_to_string(&value)).into_owned();
                path = path.replace(&format!("{{{key}}}"), &encoded);
            }
        }

        if let Some(placeholder) = first_placeholder(&path) {
            return Err(DispatchError::MissingPathParameter {
                tool: tool.name.clone(),
                placeholder: placeholder.to_string(),
            });
        }

        let url = join_url(base_url, &path)?;

        let mut headers = BTreeMap::new();
        let (query, body) = if tool.method.has_body() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
            (Vec::new(), Some(Value::Object(remaining)))
        } else {
            (query_pairs(remaining), None)
        };

        Ok(Self {
            method: tool.method,
            url,
            headers,
            query,
            body,
        })
    }
}

/// Join the configured base URL and a tool path with exactly one slash,
/// regardless of how either side was written.
fn join_url(base_url: &str, path: &str) -> Result<Url, url::ParseError> {
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    let path = path.strip_prefix('/').unwrap_or(path);
    Url::parse(&base)?.join(path)
}

/// First unresolved `{placeholder}` name in a path, if any.
fn first_placeholder(path: &str) -> Option<&str> {
    let start = path.find('{')?;
    let len = path[start..].find('}')?;
    Some(&path[start + 1..start + len])
}

/// String form of an argument value for path substitution or query encoding.
///
/// Strings pass through unquoted; numbers and booleans stringify naturally;
/// arrays and objects fall back to compact JSON.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Expand leftover arguments into query pairs. Array values repeat the key
/// once per element, which is what the remote API expects for list filters.
fn query_pairs(remaining: ArgumentBag) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(remaining.len());
    for (key, value) in remaining {
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), value_to_string(&item)));
                }
            }
            other => pairs.push((key, value_to_string(&other))),
        }
    }
    pairs
}
