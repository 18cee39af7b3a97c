//! Business extraction from Yelp Fusion search responses.

use serde::Deserialize;
use serde_json::Value;

use citycmp_core::BusinessRecord;

/// One entry of the `businesses` array, as the API returns it.
#[derive(Debug, Deserialize)]
struct ApiBusiness {
    id: String,
    name: String,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    review_count: Option<i64>,
    #[serde(default)]
    display_phone: Option<String>,
    #[serde(default)]
    location: Option<ApiLocation>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiLocation {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl From<ApiBusiness> for BusinessRecord {
    fn from(raw: ApiBusiness) -> Self {
        let location = raw.location.unwrap_or_default();
        BusinessRecord {
            id: raw.id,
            name: raw.name,
            price: raw.price,
            rating: raw.rating,
            review_count: raw.review_count,
            phone: raw.display_phone.filter(|phone| !phone.trim().is_empty()),
            city: location.city,
            state: location.state,
        }
    }
}

/// Extract businesses from one search response.
///
/// Offsets past the available results come back as an `error` payload with
/// no `businesses` key; those yield an empty list.
pub fn extract_businesses(response: &Value) -> Vec<BusinessRecord> {
    let Some(entries) = response.get("businesses").and_then(Value::as_array) else {
        if let Some(error) = response.get("error") {
            tracing::debug!(%error, "search response carries no businesses");
        }
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match ApiBusiness::deserialize(entry) {
            Ok(raw) => Some(BusinessRecord::from(raw)),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed business");
                None
            }
        })
        .collect()
}
