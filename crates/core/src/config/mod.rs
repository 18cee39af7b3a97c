//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CITY_COMPARE_*)
//! 2. TOML config file (if CITY_COMPARE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CITY_COMPARE_*)
/// 2. TOML config file (if CITY_COMPARE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Yelp Fusion API key, sent as a bearer token.
    ///
    /// Set via CITY_COMPARE_YELP_API_KEY environment variable.
    /// Required only when restaurants are fetched.
    #[serde(default)]
    pub yelp_api_key: Option<String>,

    /// Yelp business search endpoint. Responses from this endpoint are parsed as JSON.
    #[serde(default = "default_yelp_api_url")]
    pub yelp_api_url: String,

    /// First page of the Eventbrite listing for the state.
    #[serde(default = "default_events_url")]
    pub events_url: String,

    /// Number of listing pages crawled per collection run.
    #[serde(default = "default_event_page_count")]
    pub event_page_count: u32,

    /// Path to the JSON response cache.
    ///
    /// Set via CITY_COMPARE_CACHE_PATH environment variable.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Path to the SQLite database.
    ///
    /// Set via CITY_COMPARE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Path to the simplemaps US cities CSV.
    #[serde(default = "default_cities_csv")]
    pub cities_csv: PathBuf,

    /// Two-letter state id the comparison is scoped to.
    #[serde(default = "default_state")]
    pub state: String,

    /// City every user-chosen city is compared against (lowercase).
    #[serde(default = "default_reference_city")]
    pub reference_city: String,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Pause after every scraped (non-API) request, in milliseconds.
    #[serde(default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    /// Largest Yelp result offset requested.
    #[serde(default = "default_max_offset")]
    pub max_offset: u32,

    /// Yelp page size, also the distance between offsets.
    #[serde(default = "default_offset_step")]
    pub offset_step: u32,
}

fn default_yelp_api_url() -> String {
    "https://api.yelp.com/v3/businesses/search".into()
}

fn default_events_url() -> String {
    "https://www.eventbrite.com/d/united-states--michigan/all-events/".into()
}

fn default_event_page_count() -> u32 {
    52
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./cache.json")
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./city_compare.sqlite")
}

fn default_cities_csv() -> PathBuf {
    PathBuf::from("./uscities.csv")
}

fn default_state() -> String {
    "MI".into()
}

fn default_reference_city() -> String {
    "detroit".into()
}

fn default_user_agent() -> String {
    "city-compare/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_politeness_delay_ms() -> u64 {
    1_000
}

fn default_max_offset() -> u32 {
    950
}

fn default_offset_step() -> u32 {
    50
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            yelp_api_key: None,
            yelp_api_url: default_yelp_api_url(),
            events_url: default_events_url(),
            event_page_count: default_event_page_count(),
            cache_path: default_cache_path(),
            db_path: default_db_path(),
            cities_csv: default_cities_csv(),
            state: default_state(),
            reference_city: default_reference_city(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            politeness_delay_ms: default_politeness_delay_ms(),
            max_offset: default_max_offset(),
            offset_step: default_offset_step(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Politeness delay as Duration.
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `CITY_COMPARE_`
    /// 2. TOML file from `CITY_COMPARE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CITY_COMPARE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("CITY_COMPARE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the Yelp API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set or blank.
    pub fn require_yelp_api_key(&self) -> Result<&str, ConfigError> {
        self.yelp_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "yelp_api_key".into(),
                hint: "Set CITY_COMPARE_YELP_API_KEY environment variable".into(),
            })
    }
}
