//! In-process TTL cache shared by the request handlers.
//!
//! Values are stored as JSON strings so any `Serialize` type can be cached
//! behind one map. Keys are tracked separately to support regex-based bulk
//! invalidation (`remove_by_pattern("^portfolios:.*")`).

pub mod key;
pub mod tracker;

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use regex::RegexBuilder;
use serde::{de::DeserializeOwned, Serialize};
use tokio::task::JoinHandle;

pub use key::generate_key;
pub use tracker::KeyTracker;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Hint carried with each entry; the cache does not evict by priority yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePriority {
    Low,
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    Removed,
    Expired,
    PatternMatch,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
    #[allow(dead_code)]
    priority: CachePriority,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Key/value cache with absolute expiration.
///
/// Construct one per application and share it through an `Arc`.
#[derive(Debug)]
pub struct TtlCache {
    entries: DashMap<String, CacheEntry>,
    keys: KeyTracker,
    default_ttl: Duration,
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl TtlCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            keys: KeyTracker::new(),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the cached value, or `None` when absent, expired or unreadable as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.live_value(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Error retrieving cache for key: {}: {}", key, e);
                None
            }
        }
    }

    /// Stores `value` for `ttl` (default TTL when `None`).
    ///
    /// A zero TTL stores nothing and drops whatever the key held before.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        self.set_with_priority(key, value, ttl, CachePriority::Normal)
    }

    pub fn set_with_priority<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
        priority: CachePriority,
    ) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        if ttl.is_zero() {
            tracing::debug!("Zero TTL for cache key {}; entry not stored", key);
            self.evict(key, EvictionReason::Removed);
            return;
        }

        let serialized = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Error setting cache for key: {}: {}", key, e);
                return;
            }
        };

        let Some(expires_at) = Instant::now().checked_add(ttl) else {
            tracing::error!("Error setting cache for key: {}: TTL {:?} overflows the clock", key, ttl);
            return;
        };

        let entry = CacheEntry {
            value: serialized,
            expires_at,
            priority,
        };
        self.keys.with_write(|keys| {
            self.entries.insert(key.to_string(), entry);
            keys.insert(key.to_string());
        });
    }

    pub fn remove(&self, key: &str) {
        self.evict(key, EvictionReason::Removed);
    }

    /// Removes every tracked key matching `pattern` (case-insensitive regex).
    /// Returns how many entries were removed.
    pub fn remove_by_pattern(&self, pattern: &str) -> usize {
        let regex = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => regex,
            Err(e) => {
                tracing::error!("Error removing cache by pattern: {}: {}", pattern, e);
                return 0;
            }
        };

        let matched: Vec<String> = self
            .keys
            .snapshot()
            .into_iter()
            .filter(|key| regex.is_match(key))
            .collect();

        for key in &matched {
            self.evict(key, EvictionReason::PatternMatch);
        }

        tracing::debug!("Removed {} cache entries matching pattern {}", matched.len(), pattern);
        matched.len()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.live_value(key).is_some()
    }

    /// Number of tracked keys. Expired entries not yet swept are included.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Evicts every expired entry. Returns the number evicted.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.value().is_expired(now))
            .map(|entry| entry.key().clone())
            .collect();

        for key in &expired {
            self.evict(key, EvictionReason::Expired);
        }

        if !expired.is_empty() {
            tracing::debug!("Cache sweep evicted {} expired entries", expired.len());
        }
        expired.len()
    }

    /// Runs `purge_expired` every `interval` until the returned handle is aborted.
    ///
    /// A zero interval falls back to [`DEFAULT_SWEEP_INTERVAL`].
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let interval = if interval.is_zero() {
            tracing::warn!(
                "Cache sweep interval must be positive; using {:?}",
                DEFAULT_SWEEP_INTERVAL
            );
            DEFAULT_SWEEP_INTERVAL
        } else {
            interval
        };
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                cache.purge_expired();
            }
        })
    }

    fn live_value(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        // The read guard is dropped above; removing while holding it would deadlock the shard.
        if expired {
            self.evict(key, EvictionReason::Expired);
        }
        None
    }

    /// Single exit point for entries leaving the cache.
    ///
    /// Runs under the tracker's write lock, as does `set`, so a key is tracked
    /// exactly when the value store holds an entry for it. No map guard may be
    /// held by the caller.
    fn evict(&self, key: &str, reason: EvictionReason) {
        let removed = self.keys.with_write(|keys| {
            let removed = match reason {
                EvictionReason::Expired => self
                    .entries
                    .remove_if(key, |_, entry| entry.is_expired(Instant::now()))
                    .is_some(),
                EvictionReason::Removed | EvictionReason::PatternMatch => self.entries.remove(key).is_some(),
            };

            // An expired-entry eviction can lose to a fresh `set`; the key stays tracked then.
            if !self.entries.contains_key(key) {
                keys.remove(key);
            }
            removed
        });

        if removed {
            tracing::trace!("Evicted cache key {} ({:?})", key, reason);
        }
    }
}
