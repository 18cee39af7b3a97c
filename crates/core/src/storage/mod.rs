//! SQLite storage for collected locations, events and restaurants.
//!
//! Access is async via tokio-rusqlite. All queries bind their values as
//! parameters; city names are normalized by [`normalize_city_name`] before
//! they are bound.

pub mod aggregate;
pub mod connection;
pub mod inserts;
pub mod migrations;

pub use aggregate::{Aggregate, Metric};
pub use connection::CompareDb;

/// Normalize a city name to the form the cities list uses.
///
/// Every whitespace-separated word is capitalized (first letter upper, rest
/// lower) and words are joined with single spaces: `"ann  ARBOR"` becomes
/// `"Ann Arbor"`.
pub fn normalize_city_name(city: &str) -> String {
    city.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
