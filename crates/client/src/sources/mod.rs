//! Per-source collection: which requests to issue and how to read them back.

pub mod events;
pub mod yelp;

pub use events::collect_events;
pub use yelp::{BusinessSearch, YelpSource};
