// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Contiguous slot storage for the Puka Cuckoo Cache.

use crate::data_structures::puka_cuckoo_cache::error::{PukaCuckooCacheError, Result};

/// A live key/value pair together with its recency stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<K, V> {
    pub key: K,
    pub value: V,
    pub priority: u64,
    /// The two legal indices of `key` in the current table generation.
    pub homes: [usize; 2],
}

impl<K, V> Entry<K, V> {
    /// The home that is not `index`. Equal to `index` when both hash
    /// functions agree.
    pub fn other_home(&self, index: usize) -> usize {
        if self.homes[0] == index {
            self.homes[1]
        } else {
            self.homes[0]
        }
    }
}

/// A fixed-size array of slots. An empty slot is `None`.
#[derive(Debug)]
pub(crate) struct SlotTable<K, V> {
    slots: Vec<Option<Entry<K, V>>>,
}

impl<K, V> SlotTable<K, V> {
    /// Allocates `size` empty slots, reporting allocation failure instead of
    /// aborting.
    pub fn try_new(size: usize) -> Result<Self> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(size)
            .map_err(|_| PukaCuckooCacheError::AllocationError { requested: size })?;
        slots.resize_with(size, || None);
        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.slots[index].is_some()
    }

    pub fn get(&self, index: usize) -> Option<&Entry<K, V>> {
        self.slots[index].as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entry<K, V>> {
        self.slots[index].as_mut()
    }

    /// Stores `entry` in an empty slot.
    pub fn put(&mut self, index: usize, entry: Entry<K, V>) {
        debug_assert!(self.slots[index].is_none(), "slot {index} already occupied");
        self.slots[index] = Some(entry);
    }

    /// Vacates a slot, returning its entry.
    pub fn take(&mut self, index: usize) -> Option<Entry<K, V>> {
        self.slots[index].take()
    }

    /// Vacates every slot.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Moves out every entry matching `pred`, in table order.
    pub fn take_where<F>(&mut self, mut pred: F) -> Vec<Entry<K, V>>
    where
        F: FnMut(&Entry<K, V>) -> bool,
    {
        self.slots
            .iter_mut()
            .filter_map(|slot| if slot.as_ref().is_some_and(&mut pred) { slot.take() } else { None })
            .collect()
    }

    /// Occupied slots with their indices, in table order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &Entry<K, V>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|entry| (index, entry)))
    }
}
