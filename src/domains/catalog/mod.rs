//! Tool catalog domain.
//!
//! Holds the generated registry of remote API operations: tool descriptors,
//! security scheme definitions, and the name-keyed catalog built from them.
//! The catalog content itself (`catalog.json`) is generated from the upstream
//! OpenAPI document and consumed as opaque data.

mod descriptor;
mod error;
mod registry;
mod security;

pub use descriptor::{HttpMethod, SecurityRequirement, ToolDescriptor};
pub use error::CatalogError;
pub use registry::ToolCatalog;
pub use security::{ApiKeyLocation, RawSecurityScheme, SecurityScheme};
