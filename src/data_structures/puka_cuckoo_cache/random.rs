// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Buffered random bit source.
//!
//! Eviction tie-breaks consume one bit at a time, so the source keeps a small
//! buffer of entropy and only goes back to the underlying generator when every
//! bit of it has been handed out.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Size of the entropy buffer in bytes.
pub(crate) const BUFFER_BYTES: usize = 16;

const BUFFER_BITS: usize = BUFFER_BYTES * 8;

/// A random source handing out single bits from a refillable buffer.
#[derive(Debug)]
pub(crate) struct RandomSource {
    rng: StdRng,
    buffer: [u8; BUFFER_BYTES],
    /// Index of the next unread bit; `BUFFER_BITS` means exhausted.
    cursor: usize,
}

impl RandomSource {
    /// Creates a source backed by operating system entropy.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates a deterministic source. Two sources built from the same seed
    /// produce the same bit sequence.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            buffer: [0; BUFFER_BYTES],
            cursor: BUFFER_BITS,
        }
    }

    /// Returns the next bit, refilling the buffer when it runs dry.
    pub fn next_bit(&mut self) -> bool {
        if self.cursor >= BUFFER_BITS {
            self.refill();
        }
        let byte = self.buffer[self.cursor / 8];
        let bit = (byte >> (self.cursor % 8)) & 1 == 1;
        self.cursor += 1;
        bit
    }

    /// Assembles a 64-bit value out of the next 64 bits.
    pub fn next_u64(&mut self) -> u64 {
        (0..64).fold(0u64, |acc, _| (acc << 1) | u64::from(self.next_bit()))
    }

    fn refill(&mut self) {
        self.rng.fill_bytes(&mut self.buffer);
        self.cursor = 0;
    }
}
