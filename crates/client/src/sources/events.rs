//! Eventbrite listing collection.

use chrono::NaiveDate;
use serde_json::Value;

use crate::extract::extract_events;
use crate::fetch::{FetchGateway, Transport};
use crate::paginate::crawl;
use citycmp_core::{Error, EventRecord};

/// Crawl `page_count` listing pages from `base_url` and extract their events.
///
/// Events keep page order, then card order within a page. `today` anchors the
/// relative `Today at`/`Tomorrow at` calendar forms.
pub async fn collect_events<T: Transport>(
    gateway: &mut FetchGateway<T>, base_url: &str, page_count: u32, today: NaiveDate,
) -> Result<Vec<EventRecord>, Error> {
    let pages = crawl(gateway, base_url, page_count).await?;
    let mut events = Vec::new();

    for (page, value) in pages.iter().enumerate() {
        match value {
            Value::String(html) => {
                let found = extract_events(html, today);
                tracing::debug!(page, events = found.len(), "extracted listing page");
                events.extend(found);
            }
            other => tracing::warn!(page, kind = value_kind(other), "cached listing page is not HTML text"),
        }
    }

    tracing::info!(pages = pages.len(), events = events.len(), "collected events");
    Ok(events)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
