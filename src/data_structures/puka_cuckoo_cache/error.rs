// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the Puka Cuckoo Cache.

/// Errors that can occur in Puka Cuckoo Cache operations.
///
/// Every error leaves the cache in the state it had before the failing call,
/// except that an `AllocationError` raised by a growth after a successful
/// insertion keeps that insertion.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum PukaCuckooCacheError {
    /// A key could not be hashed by one of the two hash functions
    #[error("Hash calculation error: {0}")]
    HashError(String),

    /// The rehash could not obtain memory for the larger table
    #[error("Failed to allocate a table of {requested} slots")]
    AllocationError {
        /// Number of slots the rehash asked for
        requested: usize,
    },

    /// The priority clock would overflow
    #[error("Priority clock exhausted")]
    ClockExhausted,

    /// The cache was constructed with an invalid policy
    #[error("Invalid cache configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for Puka Cuckoo Cache operations
pub type Result<T> = std::result::Result<T, PukaCuckooCacheError>;
