//! Bounded header cache — a recency window over recently observed heights.
//!
//! Eviction is by recency, not by height: a bursty access pattern can evict
//! a low height before a higher one. This is the intended lookback policy.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::types::Header;

/// Default number of headers retained per chain.
pub const DEFAULT_CAPACITY: usize = 1000;

/// LRU store mapping block height → header.
///
/// Owned exclusively by one chain's monitor task; all operations are
/// non-blocking and infallible.
pub struct HeaderCache {
    entries: LruCache<u64, Header>,
}

impl HeaderCache {
    /// Create a cache holding at most `capacity` headers (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Insert or replace the entry at the header's height and mark it
    /// most-recently-used. Evicts the least-recently-used entry when full.
    pub fn add(&mut self, header: Header) {
        self.entries.put(header.height, header);
    }

    /// Header at `height`, promoted to most-recently-used on hit.
    pub fn get(&mut self, height: u64) -> Option<&Header> {
        self.entries.get(&height)
    }

    /// Number of cached headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of headers retained.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(height: u64, hash: &str) -> Header {
        Header {
            height,
            hash: hash.into(),
            parent_hash: format!("0x{}", height.saturating_sub(1)),
        }
    }

    #[test]
    fn capacity_is_enforced() {
        let mut cache = HeaderCache::new(5);
        for i in 0..20 {
            cache.add(h(i, &format!("0x{i}")));
        }
        assert_eq!(cache.len(), 5);
        // The five most recent heights survive.
        for i in 15..20 {
            assert!(cache.get(i).is_some());
        }
        assert!(cache.get(14).is_none());
    }

    #[test]
    fn eviction_is_least_recently_used() {
        let mut cache = HeaderCache::new(3);
        cache.add(h(1, "0x1"));
        cache.add(h(2, "0x2"));
        cache.add(h(3, "0x3"));
        // Touch height 1 so height 2 becomes the LRU entry.
        assert!(cache.get(1).is_some());
        cache.add(h(4, "0x4"));
        assert!(cache.get(2).is_none(), "LRU entry should be evicted");
        assert!(cache.get(1).is_some());
        assert!(cache.get(3).is_some());
        assert!(cache.get(4).is_some());
    }

    #[test]
    fn re_add_is_idempotent_and_promotes() {
        let mut cache = HeaderCache::new(2);
        cache.add(h(1, "0x1"));
        cache.add(h(2, "0x2"));
        // Re-adding height 1 keeps the size and makes height 2 the LRU entry.
        cache.add(h(1, "0x1"));
        assert_eq!(cache.len(), 2);
        cache.add(h(3, "0x3"));
        assert!(cache.get(2).is_none());
        assert!(cache.get(1).is_some());
    }

    #[test]
    fn replace_at_same_height() {
        let mut cache = HeaderCache::new(10);
        cache.add(h(7, "0xold"));
        cache.add(h(7, "0xnew"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(7).unwrap().hash, "0xnew");
    }

    #[test]
    fn zero_capacity_clamps_to_one() {
        let mut cache = HeaderCache::new(0);
        cache.add(h(1, "0x1"));
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.len(), 1);
    }
}
