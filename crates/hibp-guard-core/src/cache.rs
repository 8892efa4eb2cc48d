//! TTL cache for raw range bodies.
//!
//! [`CacheStore`] is the seam to the shared store: [`MemoryCache`] is the
//! in-process implementation, and a distributed store can be dropped in
//! without touching the decision logic. [`RangeCache`] sits between the
//! checker and a [`RangeSource`], memoizing successful fetches per prefix for
//! [`RANGE_CACHE_TTL`].
//!
//! Failures are never cached. Two evaluations that miss on the same prefix at
//! the same time may both hit the network; the last write wins.

use crate::fetcher::RangeSource;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// How long a fetched range body stays fresh: one week.
pub const RANGE_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Cache key namespace used by the built-in rule.
pub const DEFAULT_NAMESPACE: &str = "HaveIBeenPwned";

/// Source of the current time for expiry checks.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Start at `start`.
    pub fn new(start: Instant) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *current += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self
            .current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Key/value store with per-entry time-to-live.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Live value for `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key` until `ttl` has elapsed.
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now <= self.expires_at
    }
}

/// In-process [`CacheStore`]. Expired entries are hidden from reads and
/// swept out on every write.
#[derive(Debug)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    /// Empty cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Empty cache on a caller-supplied clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop expired entries, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "purged expired range entries");
        }
        removed
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| Error::Cache(format!("TTL of {ttl:?} overflows the clock")))?;

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        let swept = before - entries.len();
        if swept > 0 {
            debug!(swept, "dropped expired range entries on write");
        }
        entries.insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }
}

/// Hit/miss counters for a [`RangeCache`].
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    /// Lookups answered from the store.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that went to the range source.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

/// Memoizes range bodies per prefix in a shared [`CacheStore`].
pub struct RangeCache<S> {
    source: S,
    store: Arc<dyn CacheStore>,
    namespace: String,
    ttl: Duration,
    stats: CacheStats,
}

impl<S: RangeSource> RangeCache<S> {
    /// Cache `source` in `store` under the default namespace.
    pub fn new(source: S, store: Arc<dyn CacheStore>) -> Self {
        Self::with_namespace(source, store, DEFAULT_NAMESPACE)
    }

    /// Cache `source` in `store`, keying entries as `<namespace>_<prefix>` so
    /// several rule variants can share one store without colliding.
    pub fn with_namespace(source: S, store: Arc<dyn CacheStore>, namespace: &str) -> Self {
        Self {
            source,
            store,
            namespace: namespace.to_string(),
            ttl: RANGE_CACHE_TTL,
            stats: CacheStats::default(),
        }
    }

    /// Store key for `prefix`.
    pub fn key_for(&self, prefix: &str) -> String {
        format!("{}_{prefix}", self.namespace)
    }

    /// Hit/miss counters.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Raw body for `prefix`, from the store when live, otherwise from the
    /// source. Source failures propagate and are not stored.
    pub async fn fetch_cached(&self, prefix: &str) -> Result<String> {
        let key = self.key_for(prefix);

        if let Some(body) = self.store.get(&key).await? {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "range cache hit");
            return Ok(body);
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, "range cache miss");

        let body = self.source.fetch_range(prefix).await?;

        if let Err(err) = self.store.put(&key, body.clone(), self.ttl).await {
            warn!(key = %key, category = err.category(), "failed to store range body: {err}");
        }

        Ok(body)
    }
}
