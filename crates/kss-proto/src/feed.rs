//! Event feed store — the client-side window over the server's event list.
//!
//! The store never fetches by itself. Callers ask it whether a page/size
//! change requires a fetch, tag the fetch with `begin_fetch()`, and feed the
//! response back through `apply()`. Responses carry the sequence number they
//! were issued under; anything but the latest issued sequence is stale and
//! discarded, so rapid page flips cannot leave an older page's data on
//! screen. Every applied response replaces the list wholesale.

use tracing::debug;

use crate::model::Event;

/// Why the feed is (or is not) showing data. Distinguishes a failed fetch
/// from a genuinely empty page.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FeedError {
    #[default]
    None,
    Fetch(String),
}

#[derive(Debug)]
pub struct EventFeedStore {
    page: u32,
    limit: u32,
    events: Vec<Event>,
    loading: bool,
    error: FeedError,
    /// Sequence number of the most recently issued fetch.
    latest_seq: u64,
    /// Sequence number of the most recently applied response.
    applied_seq: u64,
}

impl EventFeedStore {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            events: Vec::new(),
            loading: false,
            error: FeedError::None,
            latest_seq: 0,
            applied_seq: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> &FeedError {
        &self.error
    }

    /// Set the page number, clamped to a lower bound of 1. Returns whether
    /// the page actually changed — each `true` must be answered by exactly
    /// one fetch.
    pub fn set_page(&mut self, page: u32) -> bool {
        let clamped = page.max(1);
        if clamped == self.page {
            return false;
        }
        self.page = clamped;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.page + 1)
    }

    /// Clamped at page 1: going back from the first page changes nothing
    /// and must not trigger a fetch.
    pub fn prev_page(&mut self) -> bool {
        self.set_page(self.page.saturating_sub(1))
    }

    pub fn set_limit(&mut self, limit: u32) -> bool {
        let clamped = limit.max(1);
        if clamped == self.limit {
            return false;
        }
        self.limit = clamped;
        true
    }

    /// Mark a fetch as in flight and return its sequence tag.
    pub fn begin_fetch(&mut self) -> u64 {
        self.latest_seq += 1;
        self.loading = true;
        debug!("[feed] fetch #{} page={} limit={}", self.latest_seq, self.page, self.limit);
        self.latest_seq
    }

    /// Apply a fetch response. Stale sequences (anything older than the
    /// latest issued) are dropped entirely; the latest response clears the
    /// loading flag whether it succeeded or failed, and on success replaces
    /// the event list wholesale.
    pub fn apply(&mut self, seq: u64, result: Result<Vec<Event>, String>) -> bool {
        if seq != self.latest_seq || seq <= self.applied_seq {
            debug!("[feed] dropping stale response #{} (latest #{})", seq, self.latest_seq);
            return false;
        }
        self.applied_seq = seq;
        self.loading = false;
        match result {
            Ok(events) => {
                self.events = events;
                self.error = FeedError::None;
            }
            Err(msg) => {
                // Keep whatever was on screen; the error line says why it
                // may be out of date.
                self.error = FeedError::Fetch(msg);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(id: i64) -> Event {
        Event {
            id,
            date: "2024-01-01T00:00:00".into(),
            objects: Vec::new(),
            avg_confidence: 0.9,
            important: false,
            read: false,
            image_id: None,
            image_url: None,
        }
    }

    #[test]
    fn test_prev_page_clamped_at_one() {
        let mut store = EventFeedStore::new(10);
        assert_eq!(store.page(), 1);
        assert!(!store.prev_page()); // no change → no fetch
        assert_eq!(store.page(), 1);
    }

    #[test]
    fn test_page_change_reports_single_fetch_needed() {
        let mut store = EventFeedStore::new(10);
        assert!(store.next_page());
        assert_eq!(store.page(), 2);
        assert!(store.prev_page());
        assert_eq!(store.page(), 1);
        assert!(!store.set_page(1)); // same page → nothing to do
    }

    #[test]
    fn test_apply_replaces_wholesale() {
        let mut store = EventFeedStore::new(10);
        let seq = store.begin_fetch();
        assert!(store.is_loading());
        assert!(store.apply(seq, Ok(vec![ev(1), ev(2)])));
        assert_eq!(store.events().len(), 2);
        assert!(!store.is_loading());

        // Next page: no residue from the prior page.
        store.next_page();
        let seq = store.begin_fetch();
        assert!(store.apply(seq, Ok(vec![ev(9)])));
        let ids: Vec<i64> = store.events().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![9]);
    }

    #[test]
    fn test_refresh_idempotent_for_same_page() {
        let mut store = EventFeedStore::new(10);
        let seq = store.begin_fetch();
        store.apply(seq, Ok(vec![ev(1)]));
        let first: Vec<i64> = store.events().iter().map(|e| e.id).collect();

        let seq = store.begin_fetch();
        store.apply(seq, Ok(vec![ev(1)]));
        let second: Vec<i64> = store.events().iter().map(|e| e.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut store = EventFeedStore::new(10);
        let old = store.begin_fetch(); // page 1 fetch in flight
        store.next_page();
        let new = store.begin_fetch(); // page 2 fetch supersedes it

        // Page 2 answer lands first.
        assert!(store.apply(new, Ok(vec![ev(20)])));
        assert!(!store.is_loading());

        // Page 1 answer straggles in — ignored, list untouched.
        assert!(!store.apply(old, Ok(vec![ev(10)])));
        let ids: Vec<i64> = store.events().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![20]);
    }

    #[test]
    fn test_stale_loading_flag_only_cleared_by_latest() {
        let mut store = EventFeedStore::new(10);
        let old = store.begin_fetch();
        let new = store.begin_fetch();
        assert!(!store.apply(old, Ok(Vec::new())));
        assert!(store.is_loading()); // newest fetch still outstanding
        assert!(store.apply(new, Ok(Vec::new())));
        assert!(!store.is_loading());
    }

    #[test]
    fn test_failure_is_distinct_from_empty() {
        let mut store = EventFeedStore::new(10);
        let seq = store.begin_fetch();
        store.apply(seq, Ok(vec![ev(1)]));

        let seq = store.begin_fetch();
        assert!(store.apply(seq, Err("connection refused".into())));
        assert!(!store.is_loading()); // finalizer ran on the failure path too
        assert_eq!(store.error(), &FeedError::Fetch("connection refused".into()));
        // Prior page kept on screen alongside the error.
        assert_eq!(store.events().len(), 1);

        let seq = store.begin_fetch();
        store.apply(seq, Ok(Vec::new()));
        assert_eq!(store.error(), &FeedError::None); // genuinely empty page
        assert!(store.events().is_empty());
    }
}
