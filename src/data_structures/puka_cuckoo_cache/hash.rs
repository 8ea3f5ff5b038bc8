// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Hash functions for the Puka Cuckoo Cache.
//!
//! Every key has two homes in the table, one per hash function. The two
//! functions use different algorithms and independent seeds so that keys
//! sharing one home rarely share the other. Seeds change with every table
//! generation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use fnv::FnvHasher;

use crate::data_structures::puka_cuckoo_cache::error::Result;

/// The pair of hash functions used to place keys.
///
/// Implementations must be deterministic for a given key and seed. A key that
/// cannot be hashed is reported through
/// [`PukaCuckooCacheError::HashError`](super::PukaCuckooCacheError::HashError),
/// which makes the calling operation fail without touching the cache.
pub trait KeyHasher<K: ?Sized> {
    /// First hash function.
    fn hash1(&self, key: &K, seed: u64) -> Result<u64>;

    /// Second hash function, independent of the first.
    fn hash2(&self, key: &K, seed: u64) -> Result<u64>;
}

/// Default hasher for any `K: Hash`.
///
/// `hash1` runs SipHash over the seed followed by the key, `hash2` runs FNV-1a
/// keyed with the seed and finishes it with a 64-bit avalanche mix so that the
/// low bits used for indexing depend on the whole input.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeededHasher;

impl<K: Hash + ?Sized> KeyHasher<K> for SeededHasher {
    fn hash1(&self, key: &K, seed: u64) -> Result<u64> {
        Ok(sip_with_seed(key, seed))
    }

    fn hash2(&self, key: &K, seed: u64) -> Result<u64> {
        let mut hasher = FnvHasher::with_key(seed);
        key.hash(&mut hasher);
        Ok(mix64(hasher.finish()))
    }
}

/// SipHash over `seed` followed by `key`.
fn sip_with_seed<K: Hash + ?Sized>(key: &K, seed: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    key.hash(&mut hasher);
    hasher.finish()
}

/// MurmurHash3 finaliser.
fn mix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

/// Seeds and table size of one table generation.
///
/// Maps keys to their two home indices in `[0, table_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HashGeneration {
    seeds: [u64; 2],
    table_size: usize,
}

impl HashGeneration {
    pub fn new(seeds: [u64; 2], table_size: usize) -> Self {
        debug_assert!(table_size > 0);
        Self { seeds, table_size }
    }

    /// Returns `[hash1(key) % table_size, hash2(key) % table_size]`.
    pub fn homes<K: ?Sized, H: KeyHasher<K>>(&self, hasher: &H, key: &K) -> Result<[usize; 2]> {
        let h1 = hasher.hash1(key, self.seeds[0])?;
        let h2 = hasher.hash2(key, self.seeds[1])?;
        Ok([self.index(h1), self.index(h2)])
    }

    fn index(&self, hash: u64) -> usize {
        (hash % self.table_size as u64) as usize
    }
}
