//! Catalog-specific error types.

use thiserror::Error;

/// Errors that can occur while loading the tool catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog JSON could not be parsed.
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two tools share the same name; dispatch would be ambiguous.
    #[error("Duplicate tool name in catalog: {0}")]
    DuplicateTool(String),
}
