// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Lazy cuckoo placement.
//!
//! An incoming entry takes the first empty home it finds. When both homes are
//! taken, the older of the two occupants is kicked out and gets exactly one
//! chance to move to its own other home. If that one is taken too, the
//! occupant is dropped from the cache instead of starting a displacement
//! chain.

use crate::data_structures::puka_cuckoo_cache::random::RandomSource;
use crate::data_structures::puka_cuckoo_cache::table::{Entry, SlotTable};

/// Outcome of placing one entry.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Placement<K, V> {
    /// The entry went into an empty home.
    Vacant,
    /// The entry displaced an occupant, which moved to its other home.
    Relocated,
    /// The entry displaced an occupant that had nowhere to go.
    Evicted(Entry<K, V>),
}

/// Returns the index of the slot holding `key`, if any.
pub(crate) fn find<K: Eq, V>(table: &SlotTable<K, V>, key: &K, homes: [usize; 2]) -> Option<usize> {
    homes
        .into_iter()
        .find(|&index| table.get(index).is_some_and(|entry| entry.key == *key))
}

/// Places `entry` at one of its homes. The entry's key must not already be in
/// the table.
pub(crate) fn place<K, V>(
    table: &mut SlotTable<K, V>,
    entry: Entry<K, V>,
    random: &mut RandomSource,
) -> Placement<K, V> {
    let homes = entry.homes;
    if let Some(index) = homes.into_iter().find(|&index| !table.is_occupied(index)) {
        table.put(index, entry);
        return Placement::Vacant;
    }

    let victim_index = choose_victim(table, homes, random);
    let Some(victim) = table.take(victim_index) else {
        // choose_victim only returns occupied slots
        table.put(victim_index, entry);
        return Placement::Vacant;
    };
    table.put(victim_index, entry);

    let alternate = victim.other_home(victim_index);
    if alternate != victim_index && !table.is_occupied(alternate) {
        tracing::trace!(from = victim_index, to = alternate, "relocated displaced entry");
        table.put(alternate, victim);
        Placement::Relocated
    } else {
        Placement::Evicted(victim)
    }
}

/// Picks the occupant with the lower priority; exact ties are settled by a
/// random bit.
fn choose_victim<K, V>(table: &SlotTable<K, V>, homes: [usize; 2], random: &mut RandomSource) -> usize {
    let [first, second] = homes;
    if first == second {
        return first;
    }

    let priority = |index: usize| table.get(index).map_or(u64::MAX, |entry| entry.priority);
    match priority(first).cmp(&priority(second)) {
        std::cmp::Ordering::Less => first,
        std::cmp::Ordering::Greater => second,
        std::cmp::Ordering::Equal => {
            if random.next_bit() {
                first
            } else {
                second
            }
        }
    }
}
