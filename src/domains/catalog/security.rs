//! Security scheme definitions.
//!
//! The catalog ships schemes in the raw OpenAPI shape (`type`, `name`, `in`,
//! `scheme`). At load time they are converted into a closed enum so that the
//! dispatch layer can match exhaustively instead of comparing strings.

use serde::Deserialize;

/// Where an API key is injected into the outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Header,
    Query,
}

/// A resolved authentication mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityScheme {
    /// API key sent as a named header or query parameter.
    ApiKey {
        location: ApiKeyLocation,
        parameter: String,
    },

    /// `Authorization: Bearer <token>`.
    BearerToken,

    /// `Authorization: Basic <base64(user:pass)>`.
    BasicAuth,
}

/// Raw scheme entry as it appears in the catalog JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSecurityScheme {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Parameter name, for `apiKey` schemes.
    #[serde(default)]
    pub name: Option<String>,

    /// `header` or `query`, for `apiKey` schemes.
    #[serde(rename = "in", default)]
    pub location: Option<ApiKeyLocation>,

    /// `bearer` or `basic`, for `http` schemes.
    #[serde(default)]
    pub scheme: Option<String>,
}

impl RawSecurityScheme {
    /// Convert the raw OpenAPI shape into the closed [`SecurityScheme`] enum.
    ///
    /// Returns `None` for scheme types this server does not support; callers
    /// skip those, matching how the original generator behaves.
    pub fn resolve(&self) -> Option<SecurityScheme> {
        match self.kind.as_str() {
            "apiKey" => Some(SecurityScheme::ApiKey {
                location: self.location.unwrap_or(ApiKeyLocation::Header),
                parameter: self.name.clone().unwrap_or_default(),
            }),
            "http" => match self.scheme.as_deref() {
                Some("bearer") => Some(SecurityScheme::BearerToken),
                Some("basic") => Some(SecurityScheme::BasicAuth),
                _ => None,
            },
            _ => None,
        }
    }
}
