//! Outbound HTTP and the cached fetch gateway.
//!
//! ### Transport
//! - One `GET` per call, query parameters and headers passed through.
//! - Non-2xx responses are errors; there are no retries.
//!
//! ### Gateway
//! - Every call is keyed by `build_key(endpoint, params)`.
//! - Hits are served from the in-memory cache mirror without network I/O.
//! - Misses fetch once, parse JSON for the API endpoint, pause after scraped
//!   pages, then write the whole cache back to disk.

pub mod gateway;
pub mod url;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, header};
use std::time::{Duration, Instant};

pub use gateway::{CacheStats, FetchGateway};
pub use url::{UrlError, parse_endpoint};

use citycmp_core::Error;

/// A single outbound GET, returning the response body as text.
///
/// The gateway is generic over this so tests can count network calls.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, endpoint: &str, params: &[(String, String)], headers: &HeaderMap) -> Result<String, Error>;
}

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "city-compare/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: "city-compare/0.1".to_string(), timeout: Duration::from_millis(20000), max_redirects: 5 }
    }
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    config: FetchConfig,
}

impl HttpTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, endpoint: &str, params: &[(String, String)], headers: &HeaderMap) -> Result<String, Error> {
        let start = Instant::now();
        let url = parse_endpoint(endpoint).map_err(|e| Error::InvalidInput(format!("{endpoint}: {e}")))?;

        let mut request = self.http.get(url.clone()).headers(headers.clone());
        if !headers.contains_key(header::ACCEPT) {
            request = request.header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8",
            );
        }
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError { url: url.to_string(), status: status.as_u16() });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("failed to read response from {url}: {e}")))?;

        tracing::debug!(
            "fetched {} in {}ms ({} bytes)",
            url,
            start.elapsed().as_millis(),
            body.len()
        );

        Ok(body)
    }
}
