// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Puka Cuckoo Cache: an in-memory key-value cache on lazy cuckoo hashing.
//!
//! Each key has two candidate slots, one per hash function. A new key takes
//! whichever is free; when both are occupied the less recently used occupant
//! is displaced and gets a single attempt to move to its own other slot
//! before it is evicted. Recency comes from a logical clock rather than
//! timestamps, and the table grows with a full rehash once it passes its
//! load threshold.
//!
//! # Features
//!
//! - O(1) amortized `get` and `put`, with exactly two probes per lookup
//! - Approximate LRU (`touch_on_read = true`) or FIFO (`false`) eviction
//! - Eviction notification through a user-supplied callback
//! - Reproducible behaviour from a fixed random seed
//! - Optional per-entry expiry through [`TtlPukaCuckooCache`]
//! - Zero unsafe code
//!
//! # Example
//!
//! ```
//! use puka_cache::data_structures::puka_cuckoo_cache::PukaCuckooCache;
//!
//! let mut cache = PukaCuckooCache::new(64, true, None)?;
//!
//! cache.put("hello".to_string(), 42)?;
//! assert_eq!(cache.get(&"hello".to_string())?, Some(&42));
//! assert_eq!(cache.get(&"world".to_string())?, None);
//!
//! // Putting an existing key overwrites its value in place
//! cache.put("hello".to_string(), 43)?;
//! assert_eq!(cache.nitems(), 1);
//!
//! // Explicit removal never reaches the eviction callback
//! assert!(cache.remove(&"hello".to_string())?);
//! # Ok::<(), puka_cache::data_structures::puka_cuckoo_cache::PukaCuckooCacheError>(())
//! ```
//!
//! # Eviction Notification
//!
//! ```
//! use std::sync::mpsc;
//! use puka_cache::data_structures::puka_cuckoo_cache::{PukaCuckooCache, PukaCuckooCacheConfig};
//!
//! let (tx, rx) = mpsc::channel();
//! let config = PukaCuckooCacheConfig::new()
//!     .with_initial_size(8)
//!     .without_growth();
//! let mut cache = PukaCuckooCache::with_config(config)?
//!     .with_eviction_callback(move |key: u32, _value: String| {
//!         let _ = tx.send(key);
//!     });
//!
//! for key in 0..9 {
//!     cache.put(key, key.to_string())?;
//! }
//!
//! // Nine keys never fit in eight slots
//! assert!(rx.try_iter().count() >= 1);
//! assert!(cache.nitems() <= 8);
//! # Ok::<(), puka_cache::data_structures::puka_cuckoo_cache::PukaCuckooCacheError>(())
//! ```

// Module declarations
mod cache;
mod clock;
mod config;
mod error;
mod hash;
mod placement;
mod random;
mod stats;
mod sync;
mod table;
mod ttl;

// Re-exports
pub use cache::{EvictionCallback, PukaCuckooCache};
pub use config::PukaCuckooCacheConfig;
pub use error::{PukaCuckooCacheError, Result};
pub use hash::{KeyHasher, SeededHasher};
pub use stats::CacheStats;
pub use sync::SyncPukaCuckooCache;
pub use ttl::{Expiring, TtlPukaCuckooCache};
