//! In-process key-value cache with per-entry TTL expiry.
//! Memoizes aggregated statistics between ingests; the ingestion path
//! invalidates it wholesale whenever new campaign data is saved.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Expiring cache guarded by a single mutex; every operation is one
/// critical section. Expiry is lazy: `get` drops an expired entry when it
/// observes one, and [`TtlCache::sweep`] exists only to bound memory and
/// keep [`TtlCache::stats`] accurate between reads.
///
/// Keys are caller-constructed opaque strings; the cache imposes no
/// structure on them. Absence is a normal outcome, never an error: a
/// legitimately cached empty value is a hit, distinguishable from a miss
/// by the `Option` itself.
pub struct TtlCache<V> {
    store: Mutex<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
}

/// Snapshot reported by [`TtlCache::stats`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub keys: Vec<String>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            store: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Returns the cached value if present and unexpired. An expired entry
    /// is removed as a side effect of being observed.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut store = self.store.lock();
        if let Some(entry) = store.get(key) {
            if now <= entry.expires_at {
                debug!(key, "cache hit");
                return Some(entry.value.clone());
            }
            store.remove(key);
        }
        None
    }

    /// Stores a value under the cache's default TTL, overwriting any
    /// existing entry for the key.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Stores a value expiring `ttl` from now, overwriting unconditionally.
    /// A zero TTL yields an entry that is already expired for the next `get`.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let expires_at = Instant::now() + ttl;
        debug!(key = %key, ttl_secs = ttl.as_secs(), "cache set");
        self.store.lock().insert(key, CacheEntry { value, expires_at });
    }

    /// Removes the entry if present, reporting whether removal occurred.
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.store.lock().remove(key).is_some();
        if removed {
            debug!(key, "cache delete");
        }
        removed
    }

    /// Removes all entries unconditionally. Called after every successful
    /// bulk ingest so stale aggregates are never served.
    pub fn clear(&self) {
        self.store.lock().clear();
        debug!("cache cleared");
    }

    /// Removes every expired entry, returning how many were dropped.
    /// Not required for `get` correctness; bounds memory growth.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut store = self.store.lock();
        let before = store.len();
        store.retain(|_, entry| now <= entry.expires_at);
        let removed = before - store.len();
        if removed > 0 {
            debug!(removed, "swept expired cache entries");
        }
        removed
    }

    /// Sweeps, then reports the live entry count and key set. Diagnostic:
    /// mutation between the sweep and the snapshot is acceptable.
    pub fn stats(&self) -> CacheStats {
        self.sweep();
        let store = self.store.lock();
        CacheStats {
            total_entries: store.len(),
            keys: store.keys().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn cache() -> TtlCache<String> {
        TtlCache::new(Duration::from_secs(300))
    }

    #[test]
    fn test_get_missing_key_is_absent() {
        let cache = cache();
        assert_eq!(cache.get("stats:none"), None);
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let cache = cache();
        cache.set("k", "v".to_string());
        assert_eq!(cache.get("k"), Some("v".to_string()));
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = cache();
        cache.set_with_ttl("k", "v".to_string(), Duration::from_millis(20));
        assert_eq!(cache.get("k"), Some("v".to_string()));

        thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get("k"), None);
        // lazy expiry already removed it
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let cache = cache();
        cache.set_with_ttl("k", "v".to_string(), Duration::ZERO);
        thread::sleep(Duration::from_millis(1));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_set_overwrites_unconditionally() {
        let cache = cache();
        cache.set("k", "v1".to_string());
        cache.set("k", "v2".to_string());
        assert_eq!(cache.get("k"), Some("v2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cached_empty_value_is_a_hit() {
        let cache: TtlCache<Vec<u32>> = TtlCache::new(Duration::from_secs(300));
        cache.set("empty", Vec::new());
        assert_eq!(cache.get("empty"), Some(Vec::new()));
    }

    #[test]
    fn test_delete_reports_removal() {
        let cache = cache();
        cache.set("k", "v".to_string());
        assert!(cache.delete("k"));
        assert!(!cache.delete("k"));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let cache = cache();
        cache.clear();
        assert!(cache.is_empty());

        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        cache.clear();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().total_entries, 0);
    }

    #[test]
    fn test_sweep_counts_expired_entries() {
        let cache = cache();
        cache.set_with_ttl("short-1", "v".to_string(), Duration::from_millis(10));
        cache.set_with_ttl("short-2", "v".to_string(), Duration::from_millis(10));
        cache.set("long", "v".to_string());

        thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.sweep(), 2);
        assert_eq!(cache.sweep(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_stats_sweeps_first() {
        let cache = cache();
        cache.set_with_ttl("short", "v".to_string(), Duration::from_millis(10));
        cache.set("long", "v".to_string());
        assert_eq!(cache.stats().total_entries, 2);

        thread::sleep(Duration::from_millis(30));
        let stats = cache.stats();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.keys, vec!["long".to_string()]);
    }
}
