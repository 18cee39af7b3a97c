//! Yelp Fusion business search.
//!
//! - **Endpoint**: `https://api.yelp.com/v3/businesses/search`
//! - **Authentication**: static `Authorization: Bearer <key>` header.
//! - **Paging**: `limit` results per call starting at `offset`; the API
//!   serves at most 1000 results per query, so offsets run 0, 50, ..., 950.

use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::extract::extract_businesses;
use crate::fetch::{FetchGateway, Transport};
use crate::paginate::OffsetCursor;
use citycmp_core::{AppConfig, BusinessRecord, ConfigError, Error, RequestSignature};

/// Results served per query across all offsets.
const RESULT_CAP: u32 = 1000;

/// Largest accepted `limit`.
const MAX_LIMIT: u32 = 50;

/// One page of a business search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessSearch {
    pub location: String,
    pub offset: u32,
    pub limit: u32,
}

impl BusinessSearch {
    /// Validate the search parameters.
    pub fn validate(&self) -> Result<(), Error> {
        if self.location.trim().is_empty() {
            return Err(Error::InvalidInput("location cannot be empty".into()));
        }
        if !(1..=MAX_LIMIT).contains(&self.limit) {
            return Err(Error::InvalidInput(format!("limit must be 1-{MAX_LIMIT}, got {}", self.limit)));
        }
        if self.offset.checked_add(self.limit).is_none_or(|end| end > RESULT_CAP) {
            return Err(Error::InvalidInput(format!(
                "offset {} + limit {} exceeds the {RESULT_CAP} result cap",
                self.offset, self.limit
            )));
        }
        Ok(())
    }

    /// Request identity for this page against `api_url`.
    pub fn signature(&self, api_url: &str) -> RequestSignature {
        RequestSignature::new(api_url)
            .param("location", &self.location)
            .param("offset", self.offset)
            .param("limit", self.limit)
    }
}

/// Business search against one API endpoint with a fixed key.
#[derive(Debug, Clone)]
pub struct YelpSource {
    api_url: String,
    headers: HeaderMap,
    max_offset: u32,
    limit: u32,
}

impl YelpSource {
    pub fn new(api_url: impl Into<String>, api_key: &str, max_offset: u32, limit: u32) -> Result<Self, Error> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "yelp_api_key".into(),
                hint: "Set CITY_COMPARE_YELP_API_KEY environment variable".into(),
            }
            .into());
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|e| Error::InvalidInput(format!("API key is not a valid header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Self { api_url: api_url.into(), headers, max_offset, limit })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let key = config.require_yelp_api_key()?;
        Self::new(&config.yelp_api_url, key, config.max_offset, config.offset_step)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// One search page per offset for `city`.
    pub fn searches(&self, city: &str) -> Vec<BusinessSearch> {
        OffsetCursor::new(self.max_offset, self.limit)
            .map(|offset| BusinessSearch { location: city.to_string(), offset, limit: self.limit })
            .collect()
    }

    /// Fetch every page for `city` and extract the businesses, in offset order.
    ///
    /// Businesses near but outside `city` are included; storage filters them.
    pub async fn fetch_businesses<T: Transport>(
        &self, gateway: &mut FetchGateway<T>, city: &str,
    ) -> Result<Vec<BusinessRecord>, Error> {
        let mut businesses = Vec::new();

        for search in self.searches(city) {
            search.validate()?;
            let response = gateway.fetch_cached(&search.signature(&self.api_url), &self.headers).await?;
            businesses.extend(extract_businesses(&response));
        }

        tracing::info!(city, businesses = businesses.len(), "fetched businesses");
        Ok(businesses)
    }
}
