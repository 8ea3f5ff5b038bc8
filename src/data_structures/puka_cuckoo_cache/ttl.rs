// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Per-entry expiry on top of the Puka Cuckoo Cache.
//!
//! Every value is stored with a deadline. An entry counts as expired from the
//! moment its deadline is reached, but it stays in the table until it is
//! overwritten, displaced or purged, so stale values remain readable through
//! [`TtlPukaCuckooCache::get_ttl`].

use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::data_structures::puka_cuckoo_cache::cache::PukaCuckooCache;
use crate::data_structures::puka_cuckoo_cache::config::PukaCuckooCacheConfig;
use crate::data_structures::puka_cuckoo_cache::error::Result;
use crate::data_structures::puka_cuckoo_cache::hash::{KeyHasher, SeededHasher};
use crate::data_structures::puka_cuckoo_cache::stats::CacheStats;

/// A cached value together with its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expiring<V> {
    value: V,
    /// `None` never expires.
    expires_at: Option<Instant>,
}

impl<V> Expiring<V> {
    fn new(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: now.checked_add(ttl),
        }
    }

    /// The cached value, fresh or not.
    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }

    /// Deadline of the entry. `None` if the TTL was too large to represent.
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Time left before the deadline, zero once it has passed. `None` for
    /// entries that never expire.
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining_at(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    fn remaining_at(&self, now: Instant) -> Option<Duration> {
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }

    /// Whether the entry expired at least `grace` before `now`.
    fn expired_for_at(&self, grace: Duration, now: Instant) -> bool {
        self.expires_at
            .and_then(|deadline| deadline.checked_add(grace))
            .is_some_and(|cutoff| cutoff <= now)
    }
}

/// A [`PukaCuckooCache`] whose entries expire after a per-entry TTL.
///
/// Placement, eviction and growth are those of the underlying cache; the TTL
/// only decides whether a stored value is still served.
pub struct TtlPukaCuckooCache<K, V, H = SeededHasher> {
    inner: PukaCuckooCache<K, Expiring<V>, H>,
}

impl<K: Hash + Eq, V> TtlPukaCuckooCache<K, V> {
    /// Creates a cache with a target capacity of `size` entries.
    pub fn new(size: usize, touch_on_read: bool) -> Result<Self> {
        Ok(Self {
            inner: PukaCuckooCache::new(size, touch_on_read, None)?,
        })
    }

    /// Creates a cache from a full configuration.
    pub fn with_config(config: PukaCuckooCacheConfig) -> Result<Self> {
        Ok(Self {
            inner: PukaCuckooCache::with_config(config)?,
        })
    }
}

impl<K: Eq, V, H: KeyHasher<K>> TtlPukaCuckooCache<K, V, H> {
    pub fn with_config_and_hasher(config: PukaCuckooCacheConfig, hasher: H) -> Result<Self> {
        Ok(Self {
            inner: PukaCuckooCache::with_config_and_hasher(config, hasher)?,
        })
    }

    /// Installs the eviction handler. Evicted values are passed on whether
    /// or not they had expired.
    pub fn with_eviction_callback<F>(mut self, mut callback: F) -> Self
    where
        F: FnMut(K, V) + Send + 'static,
    {
        self.inner = self
            .inner
            .with_eviction_callback(move |key, entry: Expiring<V>| callback(key, entry.value));
        self
    }

    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    pub fn put(&mut self, key: K, value: V, ttl: Duration) -> Result<()> {
        self.inner.put(key, Expiring::new(value, ttl, Instant::now()))
    }

    /// Stores `value` unless `key` holds a fresh entry. Returns whether the
    /// value was stored.
    pub fn add(&mut self, key: K, value: V, ttl: Duration) -> Result<bool> {
        let now = Instant::now();
        let fresh = self
            .inner
            .peek(&key)?
            .is_some_and(|entry| !entry.is_expired_at(now));
        if fresh {
            return Ok(false);
        }
        self.inner.put(key, Expiring::new(value, ttl, now))?;
        Ok(true)
    }

    /// Returns the value of `key` if it has not expired.
    pub fn get(&mut self, key: &K) -> Result<Option<&V>> {
        let now = Instant::now();
        Ok(self
            .inner
            .get(key)?
            .filter(|entry| !entry.is_expired_at(now))
            .map(Expiring::value))
    }

    /// Returns the entry for `key`, expired or not, with its deadline.
    pub fn get_ttl(&mut self, key: &K) -> Result<Option<&Expiring<V>>> {
        self.inner.get(key)
    }

    /// Whether `key` holds an entry with more than `min_ttl` left.
    pub fn contains(&self, key: &K, min_ttl: Duration) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .inner
            .peek(key)?
            .is_some_and(|entry| entry.remaining_at(now).map_or(true, |left| left > min_ttl)))
    }

    /// Marks `key` as expired without removing it. Returns whether it was
    /// present.
    pub fn expire(&mut self, key: &K) -> Result<bool> {
        let now = Instant::now();
        Ok(match self.inner.peek_mut(key)? {
            Some(entry) => {
                entry.expires_at = Some(now);
                true
            }
            None => false,
        })
    }

    /// Removes `key`. Returns whether it was present.
    pub fn remove(&mut self, key: &K) -> Result<bool> {
        self.inner.remove(key)
    }

    /// Drops every entry that expired at least `grace` ago and hands the
    /// removed pairs back. The eviction callback is not invoked.
    pub fn purge(&mut self, grace: Duration) -> Vec<(K, V)> {
        let now = Instant::now();
        let purged: Vec<(K, V)> = self
            .inner
            .remove_where(|_, entry| entry.expired_for_at(grace, now))
            .into_iter()
            .map(|(key, entry)| (key, entry.value))
            .collect();
        tracing::debug!(purged = purged.len(), remaining = self.inner.nitems(), "purged expired entries");
        purged
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Target capacity.
    pub fn size(&self) -> usize {
        self.inner.size()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }

    /// The underlying cache, for accessors not repeated here.
    pub fn cache(&self) -> &PukaCuckooCache<K, Expiring<V>, H> {
        &self.inner
    }
}

impl<K, V, H> std::fmt::Debug for TtlPukaCuckooCache<K, V, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlPukaCuckooCache")
            .field("inner", &self.inner)
            .finish()
    }
}
