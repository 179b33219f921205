//! Credential injection for outbound requests.
//!
//! Resolves a tool's declared security requirements against environment
//! variables and injects the results into the request. The environment
//! variable naming is an external contract shared with the generated
//! catalog:
//!
//! - api key:      `{SCHEME}_{PARAMETER}`
//! - bearer token: `{SCHEME}`
//! - basic auth:   `{SCHEME}_USERNAME` / `{SCHEME}_PASSWORD`
//!
//! A missing credential is never fatal here; the call proceeds and the
//! remote API rejects it if authentication was actually required.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use tracing::warn;

use crate::domains::catalog::{ApiKeyLocation, SecurityRequirement, SecurityScheme, ToolCatalog};

use super::request::OutboundRequest;

/// Apply every security requirement to the request, in declaration order.
///
/// Later requirements may overwrite headers set by earlier ones. Requirements
/// naming a scheme the catalog does not define are skipped.
pub fn apply(
    catalog: &ToolCatalog,
    requirements: &[SecurityRequirement],
    request: &mut OutboundRequest,
) {
    for requirement in requirements {
        for scheme_name in requirement.keys() {
            match catalog.scheme(scheme_name) {
                Some(scheme) => apply_scheme(scheme_name, scheme, request),
                None => warn!("Security scheme '{}' not defined in catalog", scheme_name),
            }
        }
    }
}

fn apply_scheme(name: &str, scheme: &SecurityScheme, request: &mut OutboundRequest) {
    match scheme {
        SecurityScheme::ApiKey {
            location,
            parameter,
        } => {
            let env_var = format!(
                "{}_{}",
                name.to_uppercase(),
                parameter.to_uppercase()
            );
            match std::env::var(&env_var) {
                Ok(value) => match location {
                    ApiKeyLocation::Header => {
                        request.headers.insert(parameter.clone(), value);
                    }
                    ApiKeyLocation::Query => {
                        request.query.push((parameter.clone(), value));
                    }
                },
                Err(_) => warn!("API Key environment variable not found: {}", env_var),
            }
        }
        SecurityScheme::BearerToken => {
            let env_var = name.to_uppercase();
            match std::env::var(&env_var) {
                Ok(token) => {
                    request
                        .headers
                        .insert("Authorization".to_string(), format!("Bearer {token}"));
                }
                Err(_) => warn!("Bearer Token environment variable not found: {}", env_var),
            }
        }
        SecurityScheme::BasicAuth => {
            let user_var = format!("{}_USERNAME", name.to_uppercase());
            let pass_var = format!("{}_PASSWORD", name.to_uppercase());
            match (std::env::var(&user_var), std::env::var(&pass_var)) {
                (Ok(username), Ok(password)) => {
                    let token = BASE64.encode(format!("{username}:{password}"));
                    request
                        .headers
                        .insert("Authorization".to_string(), format!("Basic {token}"));
                }
                _ => warn!("Basic auth credentials not found for {}", name),
            }
        }
    }
}
