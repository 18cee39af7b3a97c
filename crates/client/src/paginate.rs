//! Bounded page and offset sequences.
//!
//! Both cursors stop only at their configured bound. An empty or short page
//! does not end a crawl early; extraction simply yields no records for it,
//! and the cache absorbs the cost on later runs.

use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::fetch::{FetchGateway, Transport};
use citycmp_core::{Error, RequestSignature};

/// Page URLs for a listing: the base URL first, then `base?page=1`, `base?page=2`, ...
#[derive(Debug, Clone)]
pub struct PageCursor {
    base_url: String,
    next: u32,
    page_count: u32,
}

impl PageCursor {
    pub fn new(base_url: impl Into<String>, page_count: u32) -> Self {
        Self { base_url: base_url.into(), next: 0, page_count }
    }
}

impl Iterator for PageCursor {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next >= self.page_count {
            return None;
        }
        let page = self.next;
        self.next += 1;

        Some(if page == 0 { self.base_url.clone() } else { format!("{}?page={page}", self.base_url) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.page_count.saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

/// Result offsets `0, step, 2 * step, ...` up to and including `max_offset`.
#[derive(Debug, Clone)]
pub struct OffsetCursor {
    next: Option<u32>,
    step: u32,
    max_offset: u32,
}

impl OffsetCursor {
    pub fn new(max_offset: u32, step: u32) -> Self {
        Self { next: Some(0), step, max_offset }
    }
}

impl Iterator for OffsetCursor {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let current = self.next.filter(|offset| *offset <= self.max_offset)?;
        self.next = if self.step == 0 { None } else { current.checked_add(self.step) };
        Some(current)
    }
}

/// Collect the offsets of an [`OffsetCursor`]. A zero step yields `[0]`.
pub fn enumerate_offsets(max_offset: u32, step: u32) -> Vec<u32> {
    OffsetCursor::new(max_offset, step).collect()
}

/// Fetch `page_count` listing pages in order through the gateway.
///
/// Returns one cached value per page, in page order.
pub async fn crawl<T: Transport>(
    gateway: &mut FetchGateway<T>, base_url: &str, page_count: u32,
) -> Result<Vec<Value>, Error> {
    let headers = HeaderMap::new();
    let mut pages = Vec::with_capacity(page_count as usize);

    for url in PageCursor::new(base_url, page_count) {
        pages.push(gateway.fetch_cached(&RequestSignature::new(url), &headers).await?);
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::gateway::tests::{API, RecordingTransport};
    use citycmp_core::CacheStore;
    use std::time::Duration;

    #[test]
    fn test_default_offsets() {
        let offsets = enumerate_offsets(950, 50);
        assert_eq!(offsets.len(), 20);
        assert_eq!(offsets.first(), Some(&0));
        assert_eq!(offsets.last(), Some(&950));
        assert!(offsets.windows(2).all(|w| w[1] - w[0] == 50));
    }

    #[test]
    fn test_offsets_stop_below_bound() {
        assert_eq!(enumerate_offsets(120, 50), vec![0, 50, 100]);
    }

    #[test]
    fn test_offsets_zero_bound() {
        assert_eq!(enumerate_offsets(0, 50), vec![0]);
    }

    #[test]
    fn test_offsets_zero_step() {
        assert_eq!(enumerate_offsets(950, 0), vec![0]);
    }

    #[test]
    fn test_offsets_do_not_overflow() {
        let offsets = enumerate_offsets(u32::MAX, u32::MAX / 2 + 1);
        assert_eq!(offsets, vec![0, u32::MAX / 2 + 1]);
    }

    #[test]
    fn test_cursor_is_restartable() {
        let cursor = OffsetCursor::new(100, 50);
        let first: Vec<u32> = cursor.clone().collect();
        let second: Vec<u32> = cursor.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_page_urls() {
        let urls: Vec<String> = PageCursor::new("http://e/", 3).collect();
        assert_eq!(urls, vec!["http://e/", "http://e/?page=1", "http://e/?page=2"]);
    }

    #[test]
    fn test_page_cursor_size_hint() {
        let mut cursor = PageCursor::new("http://e/", 4);
        cursor.next();
        assert_eq!(cursor.size_hint(), (3, Some(3)));
    }

    #[test]
    fn test_zero_pages() {
        assert_eq!(PageCursor::new("http://e/", 0).count(), 0);
    }

    #[tokio::test]
    async fn test_crawl_fetches_each_page_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let transport = RecordingTransport::with_body("");
        let mut gateway = FetchGateway::open(transport.clone(), CacheStore::new(dir.path().join("c.json")), API)
            .with_politeness_delay(Duration::from_millis(1));

        let pages = crawl(&mut gateway, "http://e/", 3).await.unwrap();

        assert_eq!(pages.len(), 3);
        assert_eq!(transport.endpoints(), vec!["http://e/", "http://e/?page=1", "http://e/?page=2"]);
    }

    #[tokio::test]
    async fn test_crawl_does_not_stop_on_empty_pages() {
        let dir = tempfile::tempdir().unwrap();
        let transport = RecordingTransport::with_body("<html><body></body></html>");
        let mut gateway = FetchGateway::open(transport.clone(), CacheStore::new(dir.path().join("c.json")), API)
            .with_politeness_delay(Duration::from_millis(1));

        crawl(&mut gateway, "http://e/", 5).await.unwrap();
        assert_eq!(transport.call_count(), 5);

        crawl(&mut gateway, "http://e/", 5).await.unwrap();
        assert_eq!(transport.call_count(), 5);
    }
}
