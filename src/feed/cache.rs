use lru::LruCache;
use std::num::NonZeroUsize;

use super::parser::FeedEntry;

/// Default capacity of the per-feed seen-id set, matching the point at
/// which long-lived high-churn feeds start to matter for memory.
pub const DEFAULT_MAX_TRACKED_IDS: usize = 1000;

/// Per-feed conditional-request state.
///
/// Holds the HTTP validators from the last changed response plus the
/// set of entry ids already reported for this feed. One entry exists
/// per configured feed, created at startup and owned by the poll
/// scheduler for the process lifetime; exactly one task touches it per
/// cycle, so no locking is involved.
///
/// The seen set is bounded: once capacity is reached the oldest id (by
/// insertion order) is evicted. `LruCache::contains` does not promote
/// recency, so checking an id never reorders eviction.
#[derive(Debug)]
pub struct FeedCacheEntry {
    etag: Option<String>,
    last_modified: Option<String>,
    seen: LruCache<String, ()>,
}

impl FeedCacheEntry {
    /// Creates an empty cache entry. `max_tracked_ids = 0` means the
    /// seen set grows without bound.
    pub fn new(max_tracked_ids: usize) -> Self {
        let seen = match NonZeroUsize::new(max_tracked_ids) {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self {
            etag: None,
            last_modified: None,
            seen,
        }
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.last_modified.as_deref()
    }

    /// Overwrites stored validators with the ones from the latest
    /// changed response. An absent header leaves the prior value in
    /// place: servers may drop a validator between responses, and a
    /// stale validator at worst costs one full re-fetch.
    pub fn apply_validators(&mut self, etag: Option<String>, last_modified: Option<String>) {
        if etag.is_some() {
            self.etag = etag;
        }
        if last_modified.is_some() {
            self.last_modified = last_modified;
        }
    }

    /// Records an entry id as already reported. Idempotent.
    pub fn mark_seen(&mut self, id: &str) {
        self.seen.put(id.to_string(), ());
    }

    pub fn is_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// The differ: drops entries whose id is already in the seen set,
    /// marks the remainder seen, and returns them in input order.
    ///
    /// On a feed's first successful poll the seen set is empty, so every
    /// entry comes back — a deliberate choice: the current state of a
    /// status feed is reported, not silently baselined.
    pub fn filter_new(&mut self, entries: Vec<FeedEntry>) -> Vec<FeedEntry> {
        entries
            .into_iter()
            .filter(|entry| {
                if self.is_seen(&entry.id) {
                    return false;
                }
                self.mark_seen(&entry.id);
                true
            })
            .collect()
    }
}
