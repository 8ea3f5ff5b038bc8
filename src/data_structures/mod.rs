//! Data structures for the Puka cache.
//!
//! All implementations adhere to the project requirements:
//! - No unsafe code
//! - Single-owner structures; sharing across threads goes through an
//!   explicit lock adapter
//! - Cache-aware, contiguous storage

pub mod puka_cuckoo_cache;

// Re-export common data structures
pub use puka_cuckoo_cache::{
    PukaCuckooCache, PukaCuckooCacheConfig, PukaCuckooCacheError, SyncPukaCuckooCache,
};
