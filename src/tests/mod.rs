//! Test modules for the Puka cache.
//!
//! This module contains the crate-internal test suites:
//! - Configuration loading and validation
//! - Error conversions and messages
//! - Property-based tests of the cache against a model
//! - Test fixtures and utilities


// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{create_test_dir, eviction_log, operation_strategy, EvictionLog, Op, TestFixture};
