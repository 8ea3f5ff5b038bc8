// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Thread-safe adapter around the Puka Cuckoo Cache.
//!
//! The cache itself has no internal locking. This adapter puts the whole cache
//! behind one exclusive lock, which is all the synchronisation it needs: every
//! operation, including lookups that refresh priorities, mutates state.

use std::hash::Hash;

use parking_lot::Mutex;

use crate::data_structures::puka_cuckoo_cache::cache::PukaCuckooCache;
use crate::data_structures::puka_cuckoo_cache::error::Result;
use crate::data_structures::puka_cuckoo_cache::hash::{KeyHasher, SeededHasher};
use crate::data_structures::puka_cuckoo_cache::stats::CacheStats;

/// A [`PukaCuckooCache`] shareable between threads.
///
/// Lookups return clones because no reference can outlive the lock. The
/// eviction callback runs while the lock is held, so it must not call back
/// into the adapter.
#[derive(Debug)]
pub struct SyncPukaCuckooCache<K, V, H = SeededHasher> {
    inner: Mutex<PukaCuckooCache<K, V, H>>,
}

impl<K, V, H> SyncPukaCuckooCache<K, V, H>
where
    K: Eq,
    H: KeyHasher<K>,
{
    /// Wraps an existing cache.
    pub fn new(cache: PukaCuckooCache<K, V, H>) -> Self {
        Self {
            inner: Mutex::new(cache),
        }
    }

    /// Looks up `key` and clones its value.
    pub fn get(&self, key: &K) -> Result<Option<V>>
    where
        V: Clone,
    {
        Ok(self.inner.lock().get(key)?.cloned())
    }

    pub fn put(&self, key: K, value: V) -> Result<()> {
        self.inner.lock().put(key, value)
    }

    pub fn try_insert(&self, key: K, value: V) -> Result<bool> {
        self.inner.lock().try_insert(key, value)
    }

    pub fn pop(&self, key: &K) -> Result<Option<V>> {
        self.inner.lock().pop(key)
    }

    pub fn remove(&self, key: &K) -> Result<bool> {
        self.inner.lock().remove(key)
    }

    pub fn contains_key(&self, key: &K) -> Result<bool> {
        self.inner.lock().contains_key(key)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn size(&self) -> usize {
        self.inner.lock().size()
    }

    pub fn table_size(&self) -> usize {
        self.inner.lock().table_size()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// Runs `f` with exclusive access to the cache, for sequences of
    /// operations that must not interleave with other threads.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut PukaCuckooCache<K, V, H>) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    /// Unwraps the adapter.
    pub fn into_inner(self) -> PukaCuckooCache<K, V, H> {
        self.inner.into_inner()
    }
}

impl<K: Hash + Eq, V> From<PukaCuckooCache<K, V>> for SyncPukaCuckooCache<K, V> {
    fn from(cache: PukaCuckooCache<K, V>) -> Self {
        Self::new(cache)
    }
}
