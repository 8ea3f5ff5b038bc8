// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration options for the Puka Cuckoo Cache.

use serde::{Deserialize, Serialize};

use crate::data_structures::puka_cuckoo_cache::error::{PukaCuckooCacheError, Result};

/// Table ceiling, as a multiple of `initial_size`, when none is configured.
pub const DEFAULT_TABLE_HEADROOM: usize = 2;

/// Configuration for the Puka Cuckoo Cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PukaCuckooCacheConfig {
    /// Target capacity reported by the cache, and the number of slots in
    /// the first table generation.
    pub initial_size: usize,

    /// Whether a successful lookup refreshes the entry's priority.
    /// `true` approximates LRU, `false` approximates FIFO.
    pub touch_on_read: bool,

    /// Load factor above which an insertion triggers a rehash.
    pub max_load_factor: f64,

    /// Multiplier applied to the table size on every growth.
    pub growth_factor: usize,

    /// Largest table the cache may grow to. `None` means
    /// `initial_size * DEFAULT_TABLE_HEADROOM`. Setting it to `initial_size`
    /// turns growth off entirely.
    pub max_table_size: Option<usize>,

    /// Seed for the tie-break and hash-seed random source.
    /// `None` draws from operating system entropy.
    pub rng_seed: Option<u64>,
}

impl PukaCuckooCacheConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial number of slots.
    pub fn with_initial_size(mut self, initial_size: usize) -> Self {
        self.initial_size = initial_size;
        self
    }

    /// Sets whether lookups refresh priority.
    pub fn with_touch_on_read(mut self, touch_on_read: bool) -> Self {
        self.touch_on_read = touch_on_read;
        self
    }

    /// Sets the load factor that triggers growth.
    ///
    /// # Arguments
    ///
    /// * `max_load_factor` - The maximum load factor (clamped to 0.1 to 1.0).
    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor.clamp(0.1, 1.0);
        self
    }

    /// Sets the growth multiplier.
    pub fn with_growth_factor(mut self, growth_factor: usize) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Caps table growth at `max_table_size` slots.
    pub fn with_max_table_size(mut self, max_table_size: usize) -> Self {
        self.max_table_size = Some(max_table_size);
        self
    }

    /// Disables growth: the table keeps `initial_size` slots forever.
    pub fn without_growth(mut self) -> Self {
        self.max_table_size = Some(self.initial_size);
        self
    }

    /// Slot count the table never grows past.
    pub fn table_ceiling(&self) -> usize {
        self.max_table_size
            .unwrap_or_else(|| self.initial_size.saturating_mul(DEFAULT_TABLE_HEADROOM))
    }

    /// Makes tie-breaks and hash seeds reproducible.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Checks that the policy can drive a cache.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` describing the first offending field.
    pub fn check(&self) -> Result<()> {
        if self.initial_size == 0 {
            return Err(PukaCuckooCacheError::InvalidConfiguration(
                "initial_size must be greater than 0".to_string(),
            ));
        }

        if !(self.max_load_factor > 0.0 && self.max_load_factor <= 1.0) {
            return Err(PukaCuckooCacheError::InvalidConfiguration(format!(
                "max_load_factor must be in (0.0, 1.0], got {}",
                self.max_load_factor
            )));
        }

        if self.growth_factor < 2 {
            return Err(PukaCuckooCacheError::InvalidConfiguration(format!(
                "growth_factor must be at least 2, got {}",
                self.growth_factor
            )));
        }

        if let Some(max) = self.max_table_size {
            if max < self.initial_size {
                return Err(PukaCuckooCacheError::InvalidConfiguration(format!(
                    "max_table_size ({max}) must not be below initial_size ({})",
                    self.initial_size
                )));
            }
        }

        Ok(())
    }
}

impl Default for PukaCuckooCacheConfig {
    fn default() -> Self {
        Self {
            initial_size: 1_024,
            touch_on_read: true,
            max_load_factor: 0.75, // grow x2 once three quarters full
            growth_factor: 2,
            max_table_size: None,
            rng_seed: None,
        }
    }
}
