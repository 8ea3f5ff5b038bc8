//! Puka cache library
//!
//! An in-memory key-value cache built on lazy cuckoo hashing with
//! priority-based eviction, together with the configuration and logging
//! plumbing needed to run it inside a host application.
//!
//! # Architecture
//!
//! - [`data_structures::puka_cuckoo_cache`] holds the cache: slot table, hash
//!   functions, logical priority clock, random tie-breaking, placement and
//!   rehash.
//! - [`config`] loads the cache policy and logging settings from files and
//!   environment variables.
//! - [`error`] aggregates configuration and cache errors.
//! - [`logging`] installs a `tracing` subscriber.

// Re-export public modules
pub mod config;
pub mod data_structures;
pub mod error;
pub mod logging;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

use data_structures::puka_cuckoo_cache::PukaCuckooCache;
use std::hash::Hash;

/// Version information for the Puka cache.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Loads the configuration and builds a cache from it.
///
/// # Arguments
///
/// * `config_path` - Optional configuration file; defaults and `PUKA__*`
///   environment variables apply either way.
pub fn cache_from_config<K: Hash + Eq, V, P: AsRef<std::path::Path>>(
    config_path: Option<P>,
) -> error::PukaResult<PukaCuckooCache<K, V>> {
    let loaded = config::ConfigLoader::new(config_path, config::ENV_PREFIX).load()?;
    Ok(PukaCuckooCache::with_config(loaded.cache)?)
}
