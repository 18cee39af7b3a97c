//! Record extraction from fetched payloads.
//!
//! Extraction never fails as a whole: malformed cards or businesses are
//! skipped with a warning, and a page with nothing recognizable yields an
//! empty list.

pub mod businesses;
pub mod events;

pub use businesses::extract_businesses;
pub use events::{Schedule, extract_events, parse_calendar};

/// Collapse runs of whitespace and trim, as listing text is heavily indented.
pub(crate) fn clean_text<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    let joined: String = fragments.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}
