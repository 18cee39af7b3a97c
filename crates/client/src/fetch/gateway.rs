//! Cached, throttled entry point for every outbound call.

use std::time::Duration;

use reqwest::header::HeaderMap;
use serde_json::Value;

use super::Transport;
use citycmp_core::{CacheMap, CacheStore, Error, RequestSignature};

/// Minimum pause after each scraped page.
pub const DEFAULT_POLITENESS_DELAY: Duration = Duration::from_secs(1);

/// Hit/miss counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Single entry point for outbound requests.
///
/// Owns the in-memory cache mirror for the run. Every miss performs exactly
/// one network call and is written through to the [`CacheStore`] before the
/// value is returned.
pub struct FetchGateway<T: Transport> {
    transport: T,
    store: CacheStore,
    cache: CacheMap,
    api_endpoint: String,
    politeness_delay: Duration,
    stats: CacheStats,
}

impl<T: Transport> FetchGateway<T> {
    /// Load the cache from `store` and register `api_endpoint` as the one
    /// endpoint whose responses are JSON.
    pub fn open(transport: T, store: CacheStore, api_endpoint: impl Into<String>) -> Self {
        let cache = store.load();
        Self {
            transport,
            store,
            cache,
            api_endpoint: api_endpoint.into(),
            politeness_delay: DEFAULT_POLITENESS_DELAY,
            stats: CacheStats::default(),
        }
    }

    /// Override the pause applied after scraped (non-API) requests.
    pub fn with_politeness_delay(mut self, delay: Duration) -> Self {
        self.politeness_delay = delay;
        self
    }

    /// Return the cached response for `request`, fetching it on a miss.
    ///
    /// # Errors
    ///
    /// Network and HTTP errors, JSON parse errors for the API endpoint, and
    /// cache write errors all propagate. Nothing is cached for a failed call.
    pub async fn fetch_cached(&mut self, request: &RequestSignature, headers: &HeaderMap) -> Result<Value, Error> {
        let key = request.key();

        if let Some(value) = self.cache.get(&key) {
            self.stats.hits += 1;
            tracing::debug!(%key, "cache hit");
            return Ok(value.clone());
        }

        self.stats.misses += 1;
        tracing::info!(%key, "fetching");

        let body = self.transport.get(request.endpoint(), request.params(), headers).await?;

        let value = if request.endpoint() == self.api_endpoint {
            serde_json::from_str(&body).map_err(|e| Error::Parse(format!("{}: {e}", request.endpoint())))?
        } else {
            tokio::time::sleep(self.politeness_delay).await;
            Value::String(body)
        };

        self.cache.insert(key, value.clone());
        self.store.save(&self.cache)?;

        Ok(value)
    }

    pub fn contains(&self, request: &RequestSignature) -> bool {
        self.cache.contains_key(&request.key())
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }
}
