//! TTL cache for normalized upstream data.
//!
//! One store is constructed at process start and handed to every resource
//! service; services never construct their own. The upstream data volume is
//! tens to low-hundreds of routes and stops, so TTL expiry (plus a generous
//! capacity bound) is the only eviction policy.
//!
//! Every `get` emits a per-key hit or miss observation, and every `set`
//! emits a stats snapshot (key count, cumulative hits, cumulative misses);
//! both are `tracing` events so operators can separate them per key.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache as MokaCache;
use serde::Serialize;

use crate::domain::{Pattern, Route, StopSet};

/// Default TTL for cached entries: 5 minutes.
const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default maximum number of cached entries.
const DEFAULT_MAX_CAPACITY: u64 = 1000;

/// Configuration for the cache store.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries. Fixed per store; an overwrite resets the
    /// entry's expiry.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

/// A normalized payload held by the store, tagged by resource shape.
///
/// Values are `Arc`-wrapped so a cache hit hands out a shared reference
/// instead of cloning the underlying list.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Routes(Arc<Vec<Route>>),
    Patterns(Arc<Vec<Pattern>>),
    Directions(Arc<Vec<String>>),
    Stops(Arc<StopSet>),
}

/// Snapshot of cache counters, emitted on every `set`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CacheStats {
    pub keys: u64,
    pub hits: u64,
    pub misses: u64,
}

/// String-keyed TTL cache with hit/miss accounting.
///
/// Clones share the underlying cache and counters, so a store can be handed
/// to several services while remaining one logical instance. `get` and
/// `set` are individually atomic; no transaction spans multiple keys.
#[derive(Clone)]
pub struct CacheStore {
    entries: MokaCache<String, CachedValue>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl CacheStore {
    /// Create a new store with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            entries,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Look up a key. Absence (never set, expired, or flushed) is the miss
    /// signal that triggers an upstream fetch; it is not an error.
    pub async fn get(&self, key: &str) -> Option<CachedValue> {
        match self.entries.get(key).await {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::info!(key, "cache hit");
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::info!(key, "cache miss");
                None
            }
        }
    }

    /// Store a value under a key, resetting the entry's expiry on
    /// overwrite, then emit a stats snapshot.
    pub async fn set(&self, key: impl Into<String>, value: CachedValue) {
        self.entries.insert(key.into(), value).await;

        let stats = self.stats();
        tracing::info!(
            keys = stats.keys,
            hits = stats.hits,
            misses = stats.misses,
            "cache stats"
        );
    }

    /// Drop every entry. Used for operational reset and test isolation.
    pub fn flush_all(&self) {
        self.entries.invalidate_all();
    }

    /// Current counters. The key count is moka's estimate and may lag
    /// briefly behind recent writes; the hit/miss counters are exact.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            keys: self.entries.entry_count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
