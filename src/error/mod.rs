//! Error module for the Puka cache.
//!
//! Library-level errors aggregate the configuration layer and the cache
//! itself, so callers that load a configuration and build a cache from it can
//! propagate both with `?`.

use thiserror::Error;

use crate::data_structures::puka_cuckoo_cache::PukaCuckooCacheError;

pub mod config;

/// Result type alias used throughout the crate.
pub type PukaResult<T> = Result<T, PukaError>;

/// Core error enum for the Puka cache.
#[derive(Error, Debug)]
pub enum PukaError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors raised by cache operations.
    #[error("Cache error: {0}")]
    Cache(#[from] PukaCuckooCacheError),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}
