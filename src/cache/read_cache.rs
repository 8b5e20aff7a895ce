//! # Metrics Read Cache
//!
//! TTL-bounded memoization in front of "compute the health score for a
//! selection". An entry older than the TTL is never served.
//!
//! Concurrent misses on the same key both recompute and the last writer
//! wins. Nothing is held across the computation, so a slow recompute never
//! blocks readers of other keys. Entries are not evicted proactively; key
//! cardinality is bounded by repository x workflow x window.

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tracing::info;

use crate::clock::Clock;
use crate::logging::log_cache_operation;

const CACHE_NAME: &str = "metrics_read_cache";

/// Cached value and when it was stored
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: DateTime<Utc>,
}

/// Value returned by [`MetricsReadCache::get_or_compute`]
#[derive(Debug, Clone, PartialEq)]
pub struct CacheLookup<V> {
    pub value: V,
    pub inserted_at: DateTime<Utc>,
    pub from_cache: bool,
}

#[derive(Debug, Clone)]
pub struct MetricsReadCache<K, V>
where
    K: Eq + Hash,
{
    entries: Arc<DashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> MetricsReadCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Display,
    V: Clone,
{
    pub fn new(ttl: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::days(36_500)),
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        now - entry.inserted_at < self.ttl
    }

    /// Fresh entry for `key`, if any
    pub fn get_entry(&self, key: &K) -> Option<CacheEntry<V>> {
        let now = self.clock.now();
        let hit = self
            .entries
            .get(key)
            .filter(|entry| self.is_fresh(entry.value(), now))
            .map(|entry| entry.value().clone());

        log_cache_operation("get", CACHE_NAME, &key.to_string(), Some(hit.is_some()));
        hit
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_entry(key).map(|entry| entry.value)
    }

    /// Store `value`, returning its `inserted_at`.
    ///
    /// `inserted_at` never moves backwards for a key, even if the clock does.
    pub fn set(&self, key: K, value: V) -> DateTime<Utc> {
        let now = self.clock.now();
        log_cache_operation("set", CACHE_NAME, &key.to_string(), None);

        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                let inserted_at = now.max(occupied.get().inserted_at);
                occupied.insert(CacheEntry { value, inserted_at });
                inserted_at
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CacheEntry {
                    value,
                    inserted_at: now,
                });
                now
            }
        }
    }

    /// Serve a fresh entry or recompute with `compute` and store the result.
    ///
    /// A failed computation stores nothing and leaves any stale entry in place
    /// (it is still never served).
    pub async fn get_or_compute<F, Fut, E>(&self, key: &K, compute: F) -> Result<CacheLookup<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(entry) = self.get_entry(key) {
            return Ok(CacheLookup {
                value: entry.value,
                inserted_at: entry.inserted_at,
                from_cache: true,
            });
        }

        let value = compute().await?;
        let inserted_at = self.set(key.clone(), value.clone());

        Ok(CacheLookup {
            value,
            inserted_at,
            from_cache: false,
        })
    }

    pub fn invalidate(&self, key: &K) -> bool {
        log_cache_operation("invalidate", CACHE_NAME, &key.to_string(), None);
        self.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
        info!("Cleared entire metrics read cache");
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
