//! Network-facing side of city-compare.
//!
//! This crate provides the cached fetch gateway, page and offset crawling,
//! record extraction, and the city list reader used by the CLI.

pub mod cities;
pub mod extract;
pub mod fetch;
pub mod paginate;
pub mod sources;

pub use cities::{city_names_lowercase, load_state_cities, parse_city_input, read_state_cities};
pub use extract::{Schedule, extract_businesses, extract_events, parse_calendar};
pub use fetch::{CacheStats, FetchConfig, FetchGateway, HttpTransport, Transport, UrlError, parse_endpoint};
pub use paginate::{OffsetCursor, PageCursor, crawl, enumerate_offsets};
pub use sources::{BusinessSearch, YelpSource, collect_events};
