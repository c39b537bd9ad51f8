//! Shared Cache Handle
//!
//! The single process-wide store behind a cloneable handle, with the
//! read-through helper used by every data access call site.
//!
//! Values are stored type-erased and read back typed per call site, so one
//! store can hold habits, runs and transactions side by side and a single
//! invalidation can span them.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{CacheStats, CacheStore, Clock, Invalidation, SystemClock};

/// Type-erased cached payload.
pub type SharedValue = Arc<dyn Any + Send + Sync>;

// == Cache ==
/// Cloneable handle to one shared [`CacheStore`].
///
/// Built once at the composition root and passed to whichever layer does
/// data access. Every clone sees the same entries.
#[derive(Debug, Clone)]
pub struct Cache {
    store: Arc<RwLock<CacheStore<SharedValue>>>,
}

impl Cache {
    /// Creates an empty cache on the system clock.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::with_clock(default_ttl, clock))),
        }
    }

    pub async fn default_ttl(&self) -> Duration {
        self.store.read().await.default_ttl()
    }

    // == Get ==
    /// Returns the live value for `key` if it was stored as a `T`.
    ///
    /// A live entry of another type counts as a miss and is left in place.
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        // Write lock: a lookup may evict and always updates stats
        let mut store = self.store.write().await;
        store.get_with(key, |value| value.downcast_ref::<T>().cloned())
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`.
    pub async fn set<T>(&self, key: impl Into<String>, value: T, ttl: Duration)
    where
        T: Send + Sync + 'static,
    {
        self.store_value(key, value, Some(ttl)).await;
    }

    /// Stores `value` under `key` for the cache's default TTL.
    pub async fn set_default<T>(&self, key: impl Into<String>, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.store_value(key, value, None).await;
    }

    async fn store_value<T>(&self, key: impl Into<String>, value: T, ttl: Option<Duration>)
    where
        T: Send + Sync + 'static,
    {
        let value: SharedValue = Arc::new(value);
        self.store.write().await.set(key, value, ttl);
    }

    pub async fn has(&self, key: &str) -> bool {
        self.store.write().await.has(key)
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    // == With Cache ==
    /// Read-through lookup.
    ///
    /// On a hit, returns the cached value without calling `fetcher`. On a
    /// miss, awaits `fetcher` once, stores its result for `ttl` and returns
    /// it. A failed fetch is returned unchanged and nothing is cached.
    ///
    /// The store lock is not held while `fetcher` runs, so concurrent misses
    /// on the same key each run their own fetch and the last write wins.
    pub async fn with_cache<T, E, F, Fut>(
        &self,
        key: &str,
        fetcher: F,
        ttl: Duration,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.read_through(key, fetcher, Some(ttl)).await
    }

    /// [`Cache::with_cache`] using the TTL the cache was built with.
    pub async fn with_default_ttl<T, E, F, Fut>(&self, key: &str, fetcher: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.read_through(key, fetcher, None).await
    }

    async fn read_through<T, E, F, Fut>(
        &self,
        key: &str,
        fetcher: F,
        ttl: Option<Duration>,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get::<T>(key).await {
            debug!(key, "Cache hit");
            return Ok(cached);
        }

        debug!(key, "Cache miss, fetching");
        let value = fetcher().await?;
        self.store_value(key, value.clone(), ttl).await;

        Ok(value)
    }

    // == Invalidate ==
    /// Removes one key (from a `&str`/`String`) or every key a pattern selects.
    ///
    /// Returns the number of entries removed. Matching nothing is a no-op.
    pub async fn invalidate(&self, target: impl Into<Invalidation>) -> usize {
        let target = target.into();
        let removed = self.store.write().await.invalidate(&target);
        if removed > 0 {
            info!(?target, removed, "Invalidated cache entries");
        }
        removed
    }

    // == Clear ==
    /// Drops every entry, e.g. on sign-out.
    pub async fn clear(&self) -> usize {
        let removed = self.store.write().await.clear();
        info!(removed, "Cache cleared");
        removed
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::cache::ManualClock;

    const MINUTE: Duration = Duration::from_secs(60);

    fn manual_cache() -> (Cache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        (Cache::with_clock(MINUTE * 5, clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_hit_does_not_fetch() {
        let (cache, _) = manual_cache();
        cache.set("habits", vec!["read".to_string()], MINUTE).await;

        let calls = AtomicUsize::new(0);
        let result: Result<Vec<String>, String> = cache
            .with_cache(
                "habits",
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec!["fresh".to_string()])
                },
                MINUTE,
            )
            .await;

        assert_eq!(result.unwrap(), vec!["read".to_string()]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_miss_fetches_and_stores() {
        let (cache, _) = manual_cache();

        let calls = AtomicUsize::new(0);
        let value: Result<u32, String> = cache
            .with_cache(
                "k",
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                },
                Duration::from_millis(1000),
            )
            .await;

        assert_eq!(value, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get::<u32>("k").await, Some(7));
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let (cache, clock) = manual_cache();
        cache.set("runs", 1u32, Duration::from_millis(10)).await;

        clock.advance(Duration::from_millis(11));

        assert_eq!(cache.get::<u32>("runs").await, None);
        let value: Result<u32, String> = cache
            .with_cache("runs", || async { Ok(2) }, MINUTE)
            .await;
        assert_eq!(value, Ok(2));
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let (cache, _) = manual_cache();

        let first: Result<u32, &str> = cache
            .with_cache("transactions", || async { Err("network down") }, MINUTE)
            .await;
        assert_eq!(first, Err("network down"));
        assert!(!cache.has("transactions").await);

        let calls = AtomicUsize::new(0);
        let second: Result<u32, &str> = cache
            .with_cache(
                "transactions",
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(3)
                },
                MINUTE,
            )
            .await;
        assert_eq!(second, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_type_mismatch_is_a_miss_and_gets_replaced() {
        let (cache, _) = manual_cache();
        cache.set("k", "text".to_string(), MINUTE).await;

        assert_eq!(cache.get::<u32>("k").await, None);
        assert!(cache.has("k").await);

        let value: Result<u32, String> = cache.with_cache("k", || async { Ok(9) }, MINUTE).await;
        assert_eq!(value, Ok(9));
        assert_eq!(cache.get::<u32>("k").await, Some(9));
        assert_eq!(cache.get::<String>("k").await, None);
    }

    #[tokio::test]
    async fn test_clones_share_one_store() {
        let (cache, _) = manual_cache();
        let other = cache.clone();

        cache.set("habits", 1u8, MINUTE).await;
        assert_eq!(other.get::<u8>("habits").await, Some(1));

        other.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate_literal_and_pattern() {
        let (cache, _) = manual_cache();
        cache.set("transactions", 1u8, MINUTE).await;
        cache.set("financial-summary", 2u8, MINUTE).await;

        assert_eq!(cache.invalidate("transactions").await, 1);
        assert_eq!(cache.invalidate(Invalidation::pattern("^transactions")).await, 0);
        assert_eq!(cache.get::<u8>("financial-summary").await, Some(2));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_default_ttl_exposed() {
        let (cache, _) = manual_cache();
        assert_eq!(cache.default_ttl().await, MINUTE * 5);
    }

    #[tokio::test]
    async fn test_read_through_with_default_ttl() {
        let (cache, clock) = manual_cache();

        let value: Result<u32, String> = cache.with_default_ttl("habits", || async { Ok(1) }).await;
        assert_eq!(value, Ok(1));

        // Still live just before the five minute default elapses
        clock.advance(MINUTE * 5 - Duration::from_millis(1));
        assert_eq!(cache.get::<u32>("habits").await, Some(1));

        clock.advance(Duration::from_millis(1));
        assert!(!cache.has("habits").await);
    }

    #[tokio::test]
    async fn test_set_default_uses_cache_ttl() {
        let (cache, clock) = manual_cache();
        cache.set_default("runs", 3u8).await;

        clock.advance(MINUTE * 4);
        assert_eq!(cache.get::<u8>("runs").await, Some(3));

        clock.advance(MINUTE);
        assert_eq!(cache.get::<u8>("runs").await, None);
    }
}
