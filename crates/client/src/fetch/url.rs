//! Endpoint validation before a request leaves the process.
//!
//! The cache key is always built from the endpoint string as given; this
//! module only decides whether that string can be requested at all.

/// Error type for endpoint validation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse an endpoint into a requestable URL.
///
/// Only absolute `http`/`https` URLs are accepted. Fragments are dropped
/// since they are never sent to the server; the query string is kept as is.
pub fn parse_endpoint(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_fragment(None);

    Ok(parsed)
}
