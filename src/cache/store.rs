//! Cache Store Module
//!
//! Main cache engine: HashMap storage with lazy TTL expiration.
//!
//! Stale entries are never swept in the background. An expired entry stays
//! in the map until something looks up that exact key, or until an
//! invalidation or `clear` removes it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, Invalidation, SystemClock};

// == Cache Store ==
/// Key-value storage with per-entry TTL, generic over the cached value type.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Source of "now" for expiry checks
    clock: Arc<dyn Clock>,
    /// TTL for entries stored without an explicit one
    default_ttl: Duration,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store on the system clock.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            clock,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Set ==
    /// Stores a value, replacing any previous entry for `key`.
    ///
    /// The entry expires `ttl` from now (`default_ttl` if None). A zero TTL
    /// stores an entry that is already stale.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, ttl, self.clock.now_ms());

        self.entries.insert(key.into(), entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns a clone of the live value for `key`.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.get_with(key, |value| Some(value.clone()))
    }

    /// Looks up `key` and projects the live value through `read`.
    ///
    /// Counts a hit only when `read` returns Some; a live entry that `read`
    /// rejects is a miss but stays in the store.
    pub fn get_with<R>(&mut self, key: &str, read: impl FnOnce(&V) -> Option<R>) -> Option<R> {
        let found = if self.evict_if_expired(key) {
            self.entries.get(key).and_then(|entry| read(&entry.value))
        } else {
            None
        };

        match found {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        found
    }

    // == Has ==
    /// Returns true if `key` holds a live entry. Also evicts a stale one.
    pub fn has(&mut self, key: &str) -> bool {
        self.evict_if_expired(key)
    }

    // == Delete ==
    /// Removes the entry for `key`. Returns whether one was present.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.record_invalidations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Invalidate ==
    /// Removes every entry selected by `target`, live or stale.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&mut self, target: &Invalidation) -> usize {
        if let Invalidation::Key(key) = target {
            return usize::from(self.delete(key));
        }

        let before = self.entries.len();
        self.entries.retain(|key, _| !target.matches(key));
        let removed = before - self.entries.len();

        self.stats.record_invalidations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear ==
    /// Removes every entry. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.record_invalidations(removed);
        self.stats.set_total_entries(0);
        removed
    }

    // == TTL Remaining ==
    /// Remaining lifetime of a live entry, without touching stats or evicting.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.ttl_remaining_at(now))
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Number of stored entries, including stale ones not yet looked up.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if a live entry exists for `key`; removes it if stale.
    fn evict_if_expired(&mut self, key: &str) -> bool {
        let now = self.clock.now_ms();
        match self.entries.get(key) {
            None => false,
            Some(entry) if entry.is_expired_at(now) => {
                self.entries.remove(key);
                self.stats.record_expiration();
                self.stats.set_total_entries(self.entries.len());
                debug!(key, "Evicted expired entry");
                false
            }
            Some(_) => true,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    const TTL: Duration = Duration::from_secs(300);

    fn manual_store() -> (CacheStore<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        (CacheStore::with_clock(TTL, clock.clone()), clock)
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new(TTL);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.default_ttl(), TTL);
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = manual_store();

        store.set("habits", "value1".to_string(), None);

        assert_eq!(store.get("habits").as_deref(), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = manual_store();
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_overwrite_resets_value_and_ttl() {
        let (mut store, clock) = manual_store();

        store.set("runs", "v1".to_string(), Some(Duration::from_millis(100)));
        clock.advance(Duration::from_millis(80));
        store.set("runs", "v2".to_string(), Some(Duration::from_millis(100)));
        clock.advance(Duration::from_millis(80));

        assert_eq!(store.get("runs").as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration_is_lazy() {
        let (mut store, clock) = manual_store();

        store.set("k", "v".to_string(), Some(Duration::from_millis(10)));
        assert!(store.get("k").is_some());

        clock.advance(Duration::from_millis(11));

        // Still stored until someone asks for it
        assert_eq!(store.len(), 1);
        assert!(store.get("k").is_none());
        assert_eq!(store.len(), 0);
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_zero_ttl_never_hits() {
        let (mut store, _) = manual_store();

        store.set("k", "v".to_string(), Some(Duration::ZERO));

        assert!(!store.has("k"));
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_store_default_ttl_applies() {
        let (mut store, clock) = manual_store();

        store.set("k", "v".to_string(), None);
        assert_eq!(store.ttl_remaining("k"), Some(TTL));

        clock.advance(TTL);
        assert!(store.ttl_remaining("k").is_none());
        assert!(!store.has("k"));
    }

    #[test]
    fn test_store_has_evicts_stale_entry() {
        let (mut store, clock) = manual_store();

        store.set("k", "v".to_string(), Some(Duration::from_secs(1)));
        assert!(store.has("k"));

        clock.advance(Duration::from_secs(2));
        assert!(!store.has("k"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_delete() {
        let (mut store, _) = manual_store();

        store.set("k", "v".to_string(), None);
        assert!(store.delete("k"));
        assert!(store.is_empty());
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_store_delete_nonexistent_is_noop() {
        let (mut store, _) = manual_store();
        assert!(!store.delete("nonexistent"));
        assert_eq!(store.stats().invalidations, 0);
    }

    #[test]
    fn test_store_invalidate_literal_key() {
        let (mut store, _) = manual_store();

        store.set("transactions", "t".to_string(), Some(Duration::from_secs(60)));
        store.set("transactions:recent:7d", "r".to_string(), None);

        assert_eq!(store.invalidate(&Invalidation::from("transactions")), 1);
        assert!(store.get("transactions").is_none());
        assert!(store.get("transactions:recent:7d").is_some());
    }

    #[test]
    fn test_store_invalidate_prefix_scoping() {
        let (mut store, _) = manual_store();

        store.set("transactions", "t".to_string(), None);
        store.set("transactions:recent:7d", "r".to_string(), None);
        store.set("financial-summary", "s".to_string(), None);

        let removed = store.invalidate(&Invalidation::pattern("^transactions"));

        assert_eq!(removed, 2);
        assert!(!store.has("transactions"));
        assert!(!store.has("transactions:recent:7d"));
        assert!(store.has("financial-summary"));
    }

    #[test]
    fn test_store_invalidate_nothing_matches() {
        let (mut store, _) = manual_store();
        store.set("habits", "h".to_string(), None);

        assert_eq!(store.invalidate(&Invalidation::prefix("runs")), 0);
        assert_eq!(store.invalidate(&Invalidation::pattern("(")), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_clear() {
        let (mut store, _) = manual_store();

        for key in ["habits", "runs", "transactions"] {
            store.set(key, key.to_string(), Some(Duration::from_secs(3600)));
        }

        assert_eq!(store.clear(), 3);
        for key in ["habits", "runs", "transactions"] {
            assert!(!store.has(key));
        }
        assert_eq!(store.stats().invalidations, 3);
    }

    #[test]
    fn test_store_get_with_rejection_is_a_miss() {
        let (mut store, _) = manual_store();
        store.set("k", "v".to_string(), None);

        let projected: Option<usize> = store.get_with("k", |_| None);

        assert!(projected.is_none());
        assert!(store.has("k"));
        assert_eq!(store.stats().misses, 1);
        assert_eq!(store.stats().hits, 0);
    }

    #[test]
    fn test_store_stats() {
        let (mut store, _) = manual_store();

        store.set("key1", "value1".to_string(), None);
        store.get("key1"); // hit
        store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
