//! In-Memory Geolocation Cache
//!
//! Implements GeolocationCache using DashMap for lock-free concurrent
//! access, with TTL expiry, a capacity bound and per-key single-flight
//! population.

use crate::domain::entities::Geolocation;
use crate::domain::error::ResolveError;
use crate::domain::ports::{GeolocationCache, PopulateFn};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// A cached record plus its insertion instant.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Geolocation,
    stored_at: Instant,
}

/// DashMap-backed in-process cache.
///
/// Entries expire after the configured TTL (checked on read, swept by the
/// GC task) and the entry count is bounded by evicting the oldest entry at
/// insert time. Concurrent misses for the same key collapse into a single
/// populate call via an on-demand per-key lock; distinct keys never
/// contend. The hit path performs no I/O.
pub struct MemoryGeoCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    inflight: Arc<DashMap<String, Arc<Mutex<()>>>>,
    ttl: Duration,
    capacity: usize,
}

impl MemoryGeoCache {
    /// Create a new cache. A `capacity` of zero means unbounded.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            inflight: Arc::new(DashMap::new()),
            ttl,
            capacity,
        }
    }

    /// Start the background garbage collection task.
    ///
    /// Periodically removes expired entries so that rarely-read keys do not
    /// pin memory until the next lookup touches them.
    pub fn start_gc(&self, interval: Duration) {
        let entries = self.entries.clone();
        let inflight = self.inflight.clone();
        let ttl = self.ttl;

        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;

                let before = entries.len();
                entries.retain(|_, entry| entry.stored_at.elapsed() <= ttl);
                let removed = before.saturating_sub(entries.len());

                // Idle per-key locks (map reference only) go with the sweep
                inflight.retain(|_, lock| Arc::strong_count(lock) > 1);

                if removed > 0 {
                    tracing::debug!("cache GC removed {} expired entries", removed);
                }
            }
        });
    }

    /// Number of live (non-expired) entries.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.stored_at.elapsed() <= self.ttl)
            .count()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the live entry for `key`, expiring it if the TTL has passed.
    fn get_live(&self, key: &str) -> Option<Geolocation> {
        let entry = self.entries.get(key)?;
        if entry.stored_at.elapsed() > self.ttl {
            drop(entry);
            self.entries
                .remove_if(key, |_, e| e.stored_at.elapsed() > self.ttl);
            return None;
        }
        Some(entry.value.clone())
    }

    /// Insert under the capacity bound, evicting the oldest entry if full.
    fn store_entry(&self, key: &str, value: Geolocation) {
        if self.capacity > 0
            && self.entries.len() >= self.capacity
            && !self.entries.contains_key(key)
        {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().stored_at)
                .map(|entry| entry.key().clone());
            if let Some(oldest) = oldest {
                self.entries.remove(&oldest);
            }
        }

        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }
}

#[async_trait]
impl GeolocationCache for MemoryGeoCache {
    async fn get_or_populate(
        &self,
        key: &str,
        populate: PopulateFn,
    ) -> Result<Option<Geolocation>, ResolveError> {
        if let Some(value) = self.get_live(key) {
            return Ok(Some(value));
        }

        // Per-key lock so concurrent misses collapse into one populate call
        let lock = {
            let entry = self.inflight.entry(key.to_string()).or_default();
            Arc::clone(entry.value())
        };
        let guard = lock.lock().await;

        // Another flight may have populated the key while we waited
        if let Some(value) = self.get_live(key) {
            return Ok(Some(value));
        }

        let result = populate().await;

        // Only present values are stored: no negative caching, no caching
        // of failures
        if let Ok(Some(value)) = &result {
            self.store_entry(key, value.clone());
        }

        drop(guard);
        self.inflight
            .remove_if(key, |_, lock| Arc::strong_count(lock) <= 2);

        result
    }
}
