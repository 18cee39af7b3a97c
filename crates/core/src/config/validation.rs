//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Yelp returns at most this many results per query, across all offsets.
const YELP_RESULT_CAP: u32 = 1000;

/// Yelp rejects `limit` values above this.
const YELP_PAGE_LIMIT: u32 = 50;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `politeness_delay_ms` is below one second
    /// - `offset_step` is 0 or above the API page limit
    /// - the last offset page would pass the API result cap
    /// - `event_page_count` is 0
    /// - `user_agent` is empty or `state` is not a two-letter id
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.politeness_delay_ms < 1_000 {
            return Err(ConfigError::Invalid {
                field: "politeness_delay_ms".into(),
                reason: "must be at least 1000ms".into(),
            });
        }

        if self.offset_step == 0 || self.offset_step > YELP_PAGE_LIMIT {
            return Err(ConfigError::Invalid {
                field: "offset_step".into(),
                reason: format!("must be between 1 and {YELP_PAGE_LIMIT}"),
            });
        }
        if self.max_offset.checked_add(self.offset_step).is_none_or(|end| end > YELP_RESULT_CAP) {
            return Err(ConfigError::Invalid {
                field: "max_offset".into(),
                reason: format!("max_offset + offset_step must not exceed {YELP_RESULT_CAP}"),
            });
        }

        if self.event_page_count == 0 {
            return Err(ConfigError::Invalid {
                field: "event_page_count".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.state.len() != 2 || !self.state.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Invalid { field: "state".into(), reason: "must be a two-letter state id".into() });
        }

        if self.events_url == self.yelp_api_url {
            tracing::warn!(
                url = %self.events_url,
                "events_url equals yelp_api_url; event pages will be parsed as JSON"
            );
        }

        Ok(())
    }
}
