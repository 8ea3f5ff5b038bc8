// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Implementation of the Puka Cuckoo Cache.
//!
//! The cache owns a single slot table. Lookups probe the two homes of a key,
//! insertions go through the lazy placement in [`placement`], and the table is
//! rebuilt at a larger size with fresh hash seeds before an insertion would
//! push the load factor past the configured threshold. Growth stops at the
//! configured table ceiling, after which the cache keeps its size and evicts.
//!
//! [`placement`]: super::placement

use std::fmt;
use std::hash::Hash;

use crate::data_structures::puka_cuckoo_cache::clock::PriorityClock;
use crate::data_structures::puka_cuckoo_cache::config::PukaCuckooCacheConfig;
use crate::data_structures::puka_cuckoo_cache::error::{PukaCuckooCacheError, Result};
use crate::data_structures::puka_cuckoo_cache::hash::{HashGeneration, KeyHasher, SeededHasher};
use crate::data_structures::puka_cuckoo_cache::placement::{find, place, Placement};
use crate::data_structures::puka_cuckoo_cache::random::RandomSource;
use crate::data_structures::puka_cuckoo_cache::stats::CacheStats;
use crate::data_structures::puka_cuckoo_cache::table::{Entry, SlotTable};

/// Handler invoked with every entry the cache drops on its own.
///
/// It runs inline inside the `put` or `rehash` that caused the eviction.
pub type EvictionCallback<K, V> = Box<dyn FnMut(K, V) + Send>;

/// A key-value cache built on lazy cuckoo hashing.
///
/// Every key lives in one of two slots chosen by two seeded hash functions.
/// When both are taken, the less recently used occupant makes room, moving to
/// its own other slot if that one is free and leaving the cache otherwise.
/// Recency is tracked with a logical clock instead of timestamps, so ordering
/// is approximate but every operation is O(1) amortized.
///
/// The cache is single-owner: every mutating call takes `&mut self`. Wrap it
/// in [`SyncPukaCuckooCache`](super::SyncPukaCuckooCache) to share it between
/// threads.
///
/// # Type Parameters
///
/// * `K` - The key type.
/// * `V` - The value type.
/// * `H` - The pair of hash functions, [`SeededHasher`] by default.
pub struct PukaCuckooCache<K, V, H = SeededHasher> {
    table: SlotTable<K, V>,
    generation: HashGeneration,
    hasher: H,
    clock: PriorityClock,
    random: RandomSource,
    config: PukaCuckooCacheConfig,
    nitems: usize,
    on_evict: Option<EvictionCallback<K, V>>,
    stats: CacheStats,
}

impl<K: Hash + Eq, V> PukaCuckooCache<K, V> {
    /// Creates a cache with a target capacity of `initial_size` entries and
    /// the default growth policy: the table may double once, to
    /// `2 * initial_size` slots, to absorb collisions.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for a zero size, `AllocationError` if the table
    /// cannot be allocated.
    pub fn new(
        initial_size: usize,
        touch_on_read: bool,
        eviction_callback: Option<EvictionCallback<K, V>>,
    ) -> Result<Self> {
        let config = PukaCuckooCacheConfig::new()
            .with_initial_size(initial_size)
            .with_touch_on_read(touch_on_read);
        let mut cache = Self::with_config(config)?;
        cache.on_evict = eviction_callback;
        Ok(cache)
    }

    /// Creates a cache from a full configuration.
    pub fn with_config(config: PukaCuckooCacheConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, SeededHasher)
    }
}

impl<K: Eq, V, H: KeyHasher<K>> PukaCuckooCache<K, V, H> {
    /// Creates a cache that places keys with a custom pair of hash functions.
    pub fn with_config_and_hasher(config: PukaCuckooCacheConfig, hasher: H) -> Result<Self> {
        config.check()?;

        let mut random = match config.rng_seed {
            Some(seed) => RandomSource::from_seed(seed),
            None => RandomSource::from_entropy(),
        };
        let table = SlotTable::try_new(config.initial_size)?;
        let generation =
            HashGeneration::new([random.next_u64(), random.next_u64()], config.initial_size);

        Ok(Self {
            table,
            generation,
            hasher,
            clock: PriorityClock::new(),
            random,
            config,
            nitems: 0,
            on_evict: None,
            stats: CacheStats::default(),
        })
    }

    /// Installs the eviction handler, replacing any previous one.
    pub fn with_eviction_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(K, V) + Send + 'static,
    {
        self.on_evict = Some(Box::new(callback));
        self
    }

    /// Installs or removes the eviction handler.
    pub fn set_eviction_callback(&mut self, callback: Option<EvictionCallback<K, V>>) {
        self.on_evict = callback;
    }

    /// Target capacity. Fixed at construction.
    pub fn size(&self) -> usize {
        self.config.initial_size
    }

    /// Slots in the working table. Starts at `initial_size` and only grows,
    /// up to [`PukaCuckooCacheConfig::table_ceiling`].
    pub fn table_size(&self) -> usize {
        self.table.len()
    }

    /// Capacity the cache was constructed with, the baseline for growth.
    pub fn initial_size(&self) -> usize {
        self.config.initial_size
    }

    /// Number of live entries.
    pub fn nitems(&self) -> usize {
        self.nitems
    }

    /// Same as [`nitems`](Self::nitems).
    pub fn len(&self) -> usize {
        self.nitems
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.nitems == 0
    }

    /// Whether lookups refresh priority.
    pub fn touch_on_read(&self) -> bool {
        self.config.touch_on_read
    }

    /// Live entries per table slot.
    pub fn load_factor(&self) -> f64 {
        self.nitems as f64 / self.table.len() as f64
    }

    /// Counters accumulated since construction.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Policy the cache was built with.
    pub fn config(&self) -> &PukaCuckooCacheConfig {
        &self.config
    }

    /// Looks up `key`, refreshing its priority when `touch_on_read` is set.
    ///
    /// A miss is `Ok(None)`.
    pub fn get(&mut self, key: &K) -> Result<Option<&V>> {
        let homes = self.generation.homes(&self.hasher, key)?;
        let Some(index) = find(&self.table, key, homes) else {
            self.stats.misses += 1;
            return Ok(None);
        };

        if self.config.touch_on_read {
            let priority = self.clock.assign()?;
            if let Some(entry) = self.table.get_mut(index) {
                entry.priority = priority;
            }
        }
        self.stats.hits += 1;
        Ok(self.table.get(index).map(|entry| &entry.value))
    }

    /// Looks up `key` without touching its priority or the counters.
    pub fn peek(&self, key: &K) -> Result<Option<&V>> {
        Ok(self.locate(key)?.map(|entry| &entry.value))
    }

    /// Mutable access to the value of `key`, without touching its priority.
    pub fn peek_mut(&mut self, key: &K) -> Result<Option<&mut V>> {
        let homes = self.generation.homes(&self.hasher, key)?;
        Ok(find(&self.table, key, homes)
            .and_then(|index| self.table.get_mut(index))
            .map(|entry| &mut entry.value))
    }

    /// Whether `key` is cached. Does not touch its priority.
    pub fn contains_key(&self, key: &K) -> Result<bool> {
        Ok(self.locate(key)?.is_some())
    }

    /// Current priority stamp of `key`.
    pub fn priority_of(&self, key: &K) -> Result<Option<u64>> {
        Ok(self.locate(key)?.map(|entry| entry.priority))
    }

    /// Inserts or updates `key`.
    ///
    /// Updating overwrites the value in place and refreshes the priority.
    /// Inserting may first grow the table, and may evict another entry,
    /// reported through the eviction callback.
    ///
    /// # Errors
    ///
    /// `HashError` and `ClockExhausted` leave the cache unchanged.
    /// `AllocationError` means the table needed to grow and could not; the
    /// entry was not stored and the old table is untouched, so the call can
    /// be retried.
    pub fn put(&mut self, key: K, value: V) -> Result<()> {
        let homes = self.generation.homes(&self.hasher, &key)?;
        let priority = self.clock.assign()?;

        if let Some(index) = find(&self.table, &key, homes) {
            if let Some(entry) = self.table.get_mut(index) {
                entry.value = value;
                entry.priority = priority;
            }
            self.stats.updates += 1;
            return Ok(());
        }

        self.insert_new(Entry {
            key,
            value,
            priority,
            homes,
        })
    }

    /// Inserts `key` only if it is absent. Returns whether it was stored.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<bool> {
        let homes = self.generation.homes(&self.hasher, &key)?;
        if find(&self.table, &key, homes).is_some() {
            return Ok(false);
        }

        let priority = self.clock.assign()?;
        self.insert_new(Entry {
            key,
            value,
            priority,
            homes,
        })?;
        Ok(true)
    }

    /// Removes `key` and hands its value back. The eviction callback is not
    /// invoked.
    pub fn pop(&mut self, key: &K) -> Result<Option<V>> {
        let homes = self.generation.homes(&self.hasher, key)?;
        let Some(index) = find(&self.table, key, homes) else {
            return Ok(None);
        };

        let entry = self.table.take(index);
        if entry.is_some() {
            self.nitems -= 1;
        }
        Ok(entry.map(|entry| entry.value))
    }

    /// Removes `key`. Returns whether it was present.
    pub fn remove(&mut self, key: &K) -> Result<bool> {
        Ok(self.pop(key)?.is_some())
    }

    /// Removes every entry matching `pred` and hands them back. The eviction
    /// callback is not invoked.
    pub fn remove_where<F>(&mut self, mut pred: F) -> Vec<(K, V)>
    where
        F: FnMut(&K, &V) -> bool,
    {
        let removed = self.table.take_where(|entry| pred(&entry.key, &entry.value));
        self.nitems -= removed.len();
        removed
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect()
    }

    /// Drops every entry without invoking the eviction callback.
    pub fn clear(&mut self) {
        self.table.clear();
        self.nitems = 0;
    }

    /// Iterates over live entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.table
            .occupied()
            .map(|(_, entry)| (&entry.key, &entry.value))
    }

    /// Rebuilds the table with fresh hash seeds at the next growth step, or
    /// at the current size when the table already sits at its ceiling.
    pub fn rehash(&mut self) -> Result<()> {
        let new_size = self.next_table_size();
        self.rehash_to(new_size)
    }

    fn locate(&self, key: &K) -> Result<Option<&Entry<K, V>>> {
        let homes = self.generation.homes(&self.hasher, key)?;
        Ok(find(&self.table, key, homes).and_then(|index| self.table.get(index)))
    }

    fn insert_new(&mut self, mut entry: Entry<K, V>) -> Result<()> {
        if self.grow_for_insert()? {
            entry.homes = self.generation.homes(&self.hasher, &entry.key)?;
        }

        self.stats.insertions += 1;
        match place(&mut self.table, entry, &mut self.random) {
            Placement::Vacant => self.nitems += 1,
            Placement::Relocated => {
                self.nitems += 1;
                self.stats.relocations += 1;
            }
            Placement::Evicted(victim) => self.notify_eviction(victim),
        }
        Ok(())
    }

    /// Grows the table when one more entry would pass the load threshold.
    /// Returns whether a new table generation was installed.
    fn grow_for_insert(&mut self) -> Result<bool> {
        let size = self.table.len();
        if (self.nitems + 1) as f64 <= self.config.max_load_factor * size as f64 {
            return Ok(false);
        }

        let new_size = self.next_table_size();
        if new_size <= size {
            tracing::trace!(size, nitems = self.nitems, "load threshold passed at table ceiling");
            return Ok(false);
        }
        self.rehash_to(new_size)?;
        Ok(true)
    }

    fn next_table_size(&self) -> usize {
        self.table
            .len()
            .saturating_mul(self.config.growth_factor)
            .min(self.config.table_ceiling())
    }

    /// Builds a `new_size` table and replays every live entry into it, oldest
    /// first, keeping their priorities. Nothing is changed unless the new
    /// table and every entry's new homes are available.
    fn rehash_to(&mut self, new_size: usize) -> Result<()> {
        let old_size = self.table.len();
        tracing::debug!(old_size, new_size, nitems = self.nitems, "rehashing");

        let table = SlotTable::try_new(new_size).inspect_err(|_| {
            tracing::warn!(old_size, new_size, "could not allocate rehash table");
        })?;
        let generation =
            HashGeneration::new([self.random.next_u64(), self.random.next_u64()], new_size);

        let mut rehomed = Vec::new();
        rehomed
            .try_reserve_exact(self.nitems)
            .map_err(|_| PukaCuckooCacheError::AllocationError { requested: new_size })?;
        for (index, entry) in self.table.occupied() {
            rehomed.push((index, generation.homes(&self.hasher, &entry.key)?));
        }

        let mut old_table = std::mem::replace(&mut self.table, table);
        self.generation = generation;

        let mut entries: Vec<Entry<K, V>> = rehomed
            .into_iter()
            .filter_map(|(index, homes)| {
                old_table.take(index).map(|mut entry| {
                    entry.homes = homes;
                    entry
                })
            })
            .collect();
        entries.sort_unstable_by_key(|entry| entry.priority);

        let mut evicted = Vec::new();
        let mut placed = 0;
        for entry in entries {
            match place(&mut self.table, entry, &mut self.random) {
                Placement::Evicted(victim) => evicted.push(victim),
                _ => placed += 1,
            }
        }
        self.nitems = placed;
        self.stats.rehashes += 1;

        tracing::debug!(
            new_size,
            survivors = placed,
            evictions = evicted.len(),
            "rehash complete"
        );
        for victim in evicted {
            self.notify_eviction(victim);
        }
        Ok(())
    }

    fn notify_eviction(&mut self, victim: Entry<K, V>) {
        self.stats.evictions += 1;
        tracing::trace!(priority = victim.priority, "evicting entry");
        if let Some(callback) = self.on_evict.as_mut() {
            callback(victim.key, victim.value);
        }
    }

    /// Panics unless every structural invariant holds.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut priorities = std::collections::HashSet::new();
        let mut count = 0;
        for (index, entry) in self.table.occupied() {
            let homes = self
                .generation
                .homes(&self.hasher, &entry.key)
                .expect("live key must hash");
            assert_eq!(homes, entry.homes, "stale homes at slot {index}");
            assert!(homes.contains(&index), "slot {index} is not a home of its key");
            assert!(priorities.insert(entry.priority), "duplicate priority {}", entry.priority);
            assert!(entry.priority < self.clock.peek());
            count += 1;
        }
        assert_eq!(count, self.nitems);
        assert!(self.nitems <= self.table.len());
    }

    #[cfg(test)]
    pub(crate) fn with_clock(mut self, clock: PriorityClock) -> Self {
        self.clock = clock;
        self
    }
}

impl<K, V, H> fmt::Debug for PukaCuckooCache<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PukaCuckooCache")
            .field("size", &self.config.initial_size)
            .field("table_size", &self.table.len())
            .field("nitems", &self.nitems)
            .field("touch_on_read", &self.config.touch_on_read)
            .field("next_priority", &self.clock.peek())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Places keys at fixed homes: `key -> [key % n, (key / n) % n]`.
    #[derive(Debug, Clone, Copy)]
    struct FixedHasher {
        n: u64,
    }

    impl KeyHasher<u64> for FixedHasher {
        fn hash1(&self, key: &u64, _seed: u64) -> Result<u64> {
            Ok(key % self.n)
        }

        fn hash2(&self, key: &u64, _seed: u64) -> Result<u64> {
            Ok((key / self.n) % self.n)
        }
    }

    /// Rejects the key 13.
    #[derive(Debug, Clone, Copy)]
    struct PickyHasher;

    impl KeyHasher<u64> for PickyHasher {
        fn hash1(&self, key: &u64, seed: u64) -> Result<u64> {
            if *key == 13 {
                return Err(PukaCuckooCacheError::HashError("unlucky key".to_string()));
            }
            SeededHasher.hash1(key, seed)
        }

        fn hash2(&self, key: &u64, seed: u64) -> Result<u64> {
            SeededHasher.hash2(key, seed)
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<(u64, String)>>>, EvictionCallback<u64, String>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let callback: EvictionCallback<u64, String> = Box::new(move |key, value| {
            sink.lock().unwrap().push((key, value));
        });
        (log, callback)
    }

    fn fixed_cache(size: u64) -> PukaCuckooCache<u64, String, FixedHasher> {
        let config = PukaCuckooCacheConfig::new()
            .with_initial_size(size as usize)
            .with_rng_seed(1)
            .without_growth();
        PukaCuckooCache::with_config_and_hasher(config, FixedHasher { n: size }).unwrap()
    }

    #[test]
    fn test_put_and_get() {
        let mut cache = PukaCuckooCache::new(64, true, None).unwrap();
        cache.put("key1".to_string(), 1).unwrap();
        cache.put("key2".to_string(), 2).unwrap();

        assert_eq!(cache.get(&"key1".to_string()).unwrap(), Some(&1));
        assert_eq!(cache.get(&"key2".to_string()).unwrap(), Some(&2));
        assert_eq!(cache.get(&"key3".to_string()).unwrap(), None);
        assert_eq!(cache.nitems(), 2);
        cache.assert_invariants();
    }

    #[test]
    fn test_update_in_place() {
        let mut cache = PukaCuckooCache::new(64, false, None).unwrap();
        cache.put("key1".to_string(), 1).unwrap();
        let before = cache.priority_of(&"key1".to_string()).unwrap().unwrap();

        cache.put("key1".to_string(), 2).unwrap();

        assert_eq!(cache.nitems(), 1);
        assert_eq!(cache.peek(&"key1".to_string()).unwrap(), Some(&2));
        assert!(cache.priority_of(&"key1".to_string()).unwrap().unwrap() > before);
        assert_eq!(cache.stats().updates, 1);
        assert_eq!(cache.stats().insertions, 1);
    }

    #[test]
    fn test_touch_on_read_refreshes_priority() {
        let mut cache = PukaCuckooCache::new(64, true, None).unwrap();
        cache.put(7u64, "seven").unwrap();

        let mut last = cache.priority_of(&7).unwrap().unwrap();
        for _ in 0..5 {
            cache.get(&7).unwrap();
            let now = cache.priority_of(&7).unwrap().unwrap();
            assert!(now > last);
            last = now;
        }
    }

    #[test]
    fn test_fifo_mode_leaves_priority() {
        let mut cache = PukaCuckooCache::new(64, false, None).unwrap();
        cache.put(7u64, "seven").unwrap();

        let before = cache.priority_of(&7).unwrap();
        for _ in 0..5 {
            assert_eq!(cache.get(&7).unwrap(), Some(&"seven"));
        }
        assert_eq!(cache.priority_of(&7).unwrap(), before);
    }

    #[test]
    fn test_peek_does_not_touch() {
        let mut cache = PukaCuckooCache::new(64, true, None).unwrap();
        cache.put(1u64, 10u64).unwrap();
        let before = cache.priority_of(&1).unwrap();

        assert_eq!(cache.peek(&1).unwrap(), Some(&10));
        assert_eq!(cache.priority_of(&1).unwrap(), before);
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_lowest_priority_occupant_is_evicted() {
        let (log, callback) = recorder();
        let mut cache = fixed_cache(4);
        cache.set_eviction_callback(Some(callback));

        // Homes with n = 4: 0 -> [0,0], 5 -> [1,1], 10 -> [2,2], 15 -> [3,3]
        cache.put(0, "a".to_string()).unwrap();
        cache.put(5, "b".to_string()).unwrap();
        cache.put(10, "c".to_string()).unwrap();
        cache.put(15, "d".to_string()).unwrap();
        assert!(log.lock().unwrap().is_empty());

        // 1 -> [1,0]: both homes taken, key 0 is older than key 5
        cache.put(1, "e".to_string()).unwrap();

        assert_eq!(*log.lock().unwrap(), vec![(0, "a".to_string())]);
        assert_eq!(cache.get(&1).unwrap(), Some(&"e".to_string()));
        assert_eq!(cache.nitems(), 4);
        cache.assert_invariants();
    }

    #[test]
    fn test_touched_entry_survives() {
        let (log, callback) = recorder();
        let mut cache = fixed_cache(4);
        cache.set_eviction_callback(Some(callback));

        cache.put(0, "a".to_string()).unwrap();
        cache.put(5, "b".to_string()).unwrap();
        cache.get(&0).unwrap();

        // 1 -> [1,0]: key 0 was read after key 5 was written
        cache.put(1, "e".to_string()).unwrap();

        assert_eq!(*log.lock().unwrap(), vec![(5, "b".to_string())]);
        assert!(cache.contains_key(&0).unwrap());
    }

    #[test]
    fn test_victim_relocates_without_callback() {
        let (log, callback) = recorder();
        let mut cache = fixed_cache(4);
        cache.set_eviction_callback(Some(callback));

        // 4 -> [0,1], 0 -> [0,0]
        cache.put(4, "a".to_string()).unwrap();
        let before = cache.priority_of(&4).unwrap();
        cache.put(0, "b".to_string()).unwrap();

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(cache.stats().relocations, 1);
        assert_eq!(cache.nitems(), 2);
        assert_eq!(cache.peek(&4).unwrap(), Some(&"a".to_string()));
        assert_eq!(cache.priority_of(&4).unwrap(), before);
        assert_eq!(cache.peek(&0).unwrap(), Some(&"b".to_string()));
        cache.assert_invariants();
    }

    #[test]
    fn test_victim_evicted_when_alternate_taken() {
        let (log, callback) = recorder();
        let mut cache = fixed_cache(4);
        cache.set_eviction_callback(Some(callback));

        // 4 -> [0,1], 5 -> [1,1], 0 -> [0,0]
        cache.put(4, "a".to_string()).unwrap();
        cache.put(5, "b".to_string()).unwrap();
        cache.put(0, "c".to_string()).unwrap();

        assert_eq!(*log.lock().unwrap(), vec![(4, "a".to_string())]);
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.stats().relocations, 0);
        assert_eq!(cache.nitems(), 2);
        assert!(!cache.contains_key(&4).unwrap());
        cache.assert_invariants();
    }

    #[test]
    fn test_remove_does_not_notify() {
        let (log, callback) = recorder();
        let mut cache = PukaCuckooCache::new(16, true, Some(callback)).unwrap();
        cache.put(3, "three".to_string()).unwrap();

        assert!(cache.remove(&3).unwrap());
        assert!(!cache.remove(&3).unwrap());
        assert_eq!(cache.nitems(), 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_pop_returns_value() {
        let mut cache = PukaCuckooCache::new(16, true, None).unwrap();
        cache.put("k".to_string(), vec![1, 2, 3]).unwrap();

        assert_eq!(cache.pop(&"k".to_string()).unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(cache.pop(&"k".to_string()).unwrap(), None);
    }

    #[test]
    fn test_try_insert_keeps_existing() {
        let mut cache = PukaCuckooCache::new(16, true, None).unwrap();

        assert!(cache.try_insert(1u64, "first").unwrap());
        assert!(!cache.try_insert(1u64, "second").unwrap());
        assert_eq!(cache.peek(&1).unwrap(), Some(&"first"));
    }

    #[test]
    fn test_clear() {
        let (log, callback) = recorder();
        let mut cache = PukaCuckooCache::new(16, true, Some(callback)).unwrap();
        for i in 0..6 {
            cache.put(i, i.to_string()).unwrap();
        }
        let table_size = cache.table_size();

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.table_size(), table_size);
        assert_eq!(cache.iter().count(), 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_growth_on_load() {
        let config = PukaCuckooCacheConfig::new()
            .with_initial_size(8)
            .with_max_load_factor(0.5)
            .with_max_table_size(1_024)
            .with_rng_seed(5);
        let mut cache = PukaCuckooCache::with_config(config).unwrap();

        for i in 0..100u64 {
            cache.put(i, i).unwrap();
            cache.assert_invariants();
            assert!(cache.load_factor() <= 0.5);
        }

        assert!(cache.table_size() > 8);
        assert_eq!(cache.size(), 8);
        assert_eq!(cache.initial_size(), 8);
        assert!(cache.stats().rehashes > 0);
        assert!(cache.load_factor() <= 0.5);
    }

    #[test]
    fn test_growth_respects_ceiling() {
        let config = PukaCuckooCacheConfig::new()
            .with_initial_size(8)
            .with_max_load_factor(0.5)
            .with_max_table_size(20)
            .with_rng_seed(5);
        let mut cache = PukaCuckooCache::with_config(config).unwrap();

        for i in 0..200u64 {
            cache.put(i, i).unwrap();
        }

        assert_eq!(cache.table_size(), 20);
        assert!(cache.nitems() <= 20);
        cache.assert_invariants();
    }

    #[test]
    fn test_default_growth_is_bounded_by_target() {
        let (log, callback) = recorder();
        let mut cache = PukaCuckooCache::new(4, true, Some(callback)).unwrap();

        for i in 0..10_000u64 {
            cache.put(i, i.to_string()).unwrap();
            assert!(cache.nitems() <= 8);
        }

        assert_eq!(cache.size(), 4);
        assert_eq!(cache.table_size(), 8);
        assert_eq!(cache.nitems() + log.lock().unwrap().len(), 10_000);
        cache.assert_invariants();
    }

    #[test]
    fn test_failed_growth_leaves_cache_unchanged() {
        let config = PukaCuckooCacheConfig::new()
            .with_initial_size(4)
            .with_growth_factor(1 << 62)
            .with_max_table_size(usize::MAX)
            .with_rng_seed(3);
        // Keys 0..3 have the single homes 0..3
        let mut cache =
            PukaCuckooCache::<u64, u64, _>::with_config_and_hasher(config, FixedHasher { n: 4 })
                .unwrap();
        for i in 0..3u64 {
            cache.put(i, i).unwrap();
        }
        let stats = cache.stats();

        // A fourth entry would pass 0.75 load and the grown table cannot exist
        for _ in 0..2 {
            assert_eq!(
                cache.put(3, 3),
                Err(PukaCuckooCacheError::AllocationError { requested: usize::MAX })
            );
            assert_eq!(cache.nitems(), 3);
            assert_eq!(cache.peek(&3).unwrap(), None);
            assert_eq!(cache.table_size(), 4);
            assert_eq!(cache.stats(), stats);
        }

        // Updates never need to grow
        cache.put(0, 100).unwrap();
        assert_eq!(cache.peek(&0).unwrap(), Some(&100));
        for i in 1..3u64 {
            assert_eq!(cache.peek(&i).unwrap(), Some(&i));
        }
        cache.assert_invariants();
    }

    #[test]
    fn test_grown_entry_lands_in_new_generation() {
        let config = PukaCuckooCacheConfig::new()
            .with_initial_size(4)
            .with_max_load_factor(0.25)
            .with_rng_seed(8);
        let mut cache = PukaCuckooCache::with_config(config).unwrap();

        cache.put(0u64, 0u64).unwrap();
        assert_eq!(cache.table_size(), 4);

        // The second entry would pass the threshold, so it is placed after growth
        cache.put(1, 1).unwrap();

        assert_eq!(cache.table_size(), 8);
        assert_eq!(cache.peek(&1).unwrap(), Some(&1));
        assert_eq!(cache.stats().rehashes, 1);
        cache.assert_invariants();
    }

    #[test]
    fn test_peek_mut_keeps_priority() {
        let mut cache = PukaCuckooCache::new(16, true, None).unwrap();
        cache.put(1u64, 10u64).unwrap();
        let before = cache.priority_of(&1).unwrap();

        if let Some(value) = cache.peek_mut(&1).unwrap() {
            *value += 1;
        }

        assert_eq!(cache.peek(&1).unwrap(), Some(&11));
        assert_eq!(cache.priority_of(&1).unwrap(), before);
        assert!(cache.peek_mut(&2).unwrap().is_none());
    }

    #[test]
    fn test_remove_where_is_silent() {
        let (log, callback) = recorder();
        let mut cache = PukaCuckooCache::new(64, true, Some(callback)).unwrap();
        for i in 0..10u64 {
            cache.put(i, i.to_string()).unwrap();
        }
        let present = cache.nitems();

        let mut removed = cache.remove_where(|key, _| key % 2 == 0);
        removed.sort_unstable();

        assert!(removed.iter().all(|(key, value)| key % 2 == 0 && *value == key.to_string()));
        assert_eq!(cache.nitems(), present - removed.len());
        assert!(cache.iter().all(|(key, _)| key % 2 == 1));
        assert!(log.lock().unwrap().is_empty());
        cache.assert_invariants();
    }

    #[test]
    fn test_forced_rehash_preserves_priorities() {
        let mut cache = PukaCuckooCache::with_config(
            PukaCuckooCacheConfig::new()
                .with_initial_size(1024)
                .with_rng_seed(11),
        )
        .unwrap();
        for i in 0..20u64 {
            cache.put(i, i * 10).unwrap();
        }
        let before: Vec<Option<u64>> = (0..20u64).map(|i| cache.priority_of(&i).unwrap()).collect();

        cache.rehash().unwrap();

        assert_eq!(cache.table_size(), 2048);
        assert_eq!(cache.size(), 1024);
        let after: Vec<Option<u64>> = (0..20u64).map(|i| cache.priority_of(&i).unwrap()).collect();
        assert_eq!(before, after);
        for i in 0..20u64 {
            assert_eq!(cache.peek(&i).unwrap(), Some(&(i * 10)));
        }
        cache.assert_invariants();
    }

    #[test]
    fn test_rehash_at_ceiling_reseeds_in_place() {
        let mut cache = fixed_cache(4);
        cache.put(0, "a".to_string()).unwrap();
        cache.rehash().unwrap();

        assert_eq!(cache.table_size(), 4);
        assert_eq!(cache.stats().rehashes, 1);
        assert_eq!(cache.peek(&0).unwrap(), Some(&"a".to_string()));
    }

    #[test]
    fn test_hash_error_leaves_cache_unchanged() {
        let config = PukaCuckooCacheConfig::new().with_initial_size(16).with_rng_seed(2);
        let mut cache = PukaCuckooCache::<u64, u64, _>::with_config_and_hasher(config, PickyHasher).unwrap();
        cache.put(1, 1).unwrap();
        let stats = cache.stats();

        let err = cache.put(13, 13).unwrap_err();
        assert_eq!(err, PukaCuckooCacheError::HashError("unlucky key".to_string()));
        assert!(cache.get(&13).is_err());
        assert!(cache.remove(&13).is_err());

        assert_eq!(cache.nitems(), 1);
        assert_eq!(cache.stats(), stats);
        assert_eq!(cache.priority_of(&1).unwrap(), Some(0));
    }

    #[test]
    fn test_clock_exhaustion_is_an_error() {
        let mut cache = PukaCuckooCache::new(16, true, None)
            .unwrap()
            .with_clock(PriorityClock::starting_at(u64::MAX - 1));
        cache.put(1u64, 1u64).unwrap();

        assert_eq!(cache.put(2, 2), Err(PukaCuckooCacheError::ClockExhausted));
        assert_eq!(cache.get(&1), Err(PukaCuckooCacheError::ClockExhausted));
        assert_eq!(cache.nitems(), 1);
        assert_eq!(cache.peek(&2).unwrap(), None);
    }

    #[test]
    fn test_zero_size_rejected() {
        let result = PukaCuckooCache::<u64, u64>::new(0, true, None);
        assert!(matches!(
            result,
            Err(PukaCuckooCacheError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_iter_visits_every_entry() {
        let mut cache = PukaCuckooCache::new(64, true, None).unwrap();
        for i in 0..10u64 {
            cache.put(i, i + 100).unwrap();
        }

        let mut seen: Vec<(u64, u64)> = cache.iter().map(|(k, v)| (*k, *v)).collect();
        seen.sort_unstable();
        assert_eq!(seen.len(), cache.nitems());
        assert!(seen.iter().all(|(k, v)| *v == k + 100));
    }
}
