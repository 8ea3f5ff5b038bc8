// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Operation counters for the Puka Cuckoo Cache.

use serde::{Deserialize, Serialize};

/// Snapshot of what a cache has done since it was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups that found their key
    pub hits: u64,
    /// Lookups that did not
    pub misses: u64,
    /// Puts that stored a new key
    pub insertions: u64,
    /// Puts that overwrote an existing key
    pub updates: u64,
    /// Displaced entries that moved to their other home
    pub relocations: u64,
    /// Entries dropped by the cache itself
    pub evictions: u64,
    /// Table rebuilds
    pub rehashes: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit, or 0.0 before the first lookup.
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}
