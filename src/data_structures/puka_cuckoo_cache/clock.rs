// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Logical clock issuing recency stamps.

use crate::data_structures::puka_cuckoo_cache::error::{PukaCuckooCacheError, Result};

/// Monotonic priority counter. A higher stamp means a more recent use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PriorityClock {
    next: u64,
}

impl PriorityClock {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    #[cfg(test)]
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Issues the next stamp.
    ///
    /// Fails with `ClockExhausted` instead of wrapping; the counter is left
    /// untouched on failure.
    pub fn assign(&mut self) -> Result<u64> {
        let stamp = self.next;
        self.next = stamp
            .checked_add(1)
            .ok_or(PukaCuckooCacheError::ClockExhausted)?;
        Ok(stamp)
    }

    /// The stamp the next call to `assign` will return.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for PriorityClock {
    fn default() -> Self {
        Self::new()
    }
}
