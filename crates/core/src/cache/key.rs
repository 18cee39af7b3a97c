//! Canonical cache keys for outbound requests.

use std::fmt::Display;

const CONNECTOR: &str = "_";

/// Build the canonical cache key for an endpoint and its query parameters.
///
/// With no parameters the key is the endpoint verbatim. Otherwise every
/// parameter becomes a `name_value` token, the tokens are sorted, joined with
/// `_` and appended to the endpoint after another `_`.
pub fn build_key(endpoint: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return endpoint.to_string();
    }

    let mut tokens: Vec<String> = params.iter().map(|(name, value)| format!("{name}{CONNECTOR}{value}")).collect();
    tokens.sort();

    format!("{endpoint}{CONNECTOR}{}", tokens.join(CONNECTOR))
}

/// An outbound request identity: endpoint plus query parameters.
///
/// Parameter values go through `Display`, so integers always render as
/// plain base-10 digits and identical requests share one cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSignature {
    endpoint: String,
    params: Vec<(String, String)>,
}

impl RequestSignature {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), params: Vec::new() }
    }

    /// Add a query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Canonical cache key, see [`build_key`].
    pub fn key(&self) -> String {
        build_key(&self.endpoint, &self.params)
    }
}
