//! Structured records produced by extraction and consumed by storage.

use serde::{Deserialize, Serialize};

/// Placeholder city for events whose location line carries no city.
pub const CITY_NOT_AVAILABLE: &str = "City Not Available";

/// Placeholder state for events whose location line carries no state.
pub const STATE_NOT_AVAILABLE: &str = "State Not Available";

/// Placeholder venue for events without a location line.
pub const LOCATION_NOT_AVAILABLE: &str = "Location Not Available";

/// One event listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    /// Venue name.
    pub location: String,
    pub city: String,
    pub state: String,
    /// Abbreviated weekday, e.g. `Sat`.
    pub day: String,
    /// Month and day, e.g. `Apr 18`.
    pub date: String,
    /// Start time as listed, e.g. `3:00 PM`.
    pub time: String,
}

/// One business from the review API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    /// Externally supplied unique business id.
    pub id: String,
    pub name: String,
    pub price: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// One row of the US cities list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    pub city: String,
    /// Two-letter state id.
    pub state: String,
}
