//! Benchmark workloads and utilities for the Strata storage toolkit.
//!
//! Provides deterministic workload builders shared by the bench targets:
//!
//! - [`Lcg`]: a tiny seeded generator for reproducible churn sequences
//! - [`churn_slot_map`]: interleaved insert/remove traffic on a [`SlotMap`]
//! - [`build_table`]: a populated [`Table`] of the given shape

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_core::Key;
use strata_store::{SlotMap, Table};

/// Minimal linear congruential generator for deterministic workloads.
///
/// Not a statistical RNG; just enough to pick victims reproducibly.
pub struct Lcg(u64);

impl Lcg {
    /// Seed the generator.
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407))
    }

    /// Next raw value.
    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    /// Next value in `0..bound` (`bound` must be non-zero).
    pub fn next_below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}

/// Run `rounds` of interleaved insert/remove traffic against a slot map.
///
/// Each round inserts one value and, every other round, removes a random
/// live victim. Returns the surviving keys so callers can keep resolving
/// them afterwards.
pub fn churn_slot_map(map: &mut SlotMap<u64>, rounds: usize, seed: u64) -> Vec<Key> {
    let mut rng = Lcg::new(seed);
    let mut live = Vec::with_capacity(rounds);

    for round in 0..rounds as u64 {
        let key = map.insert(round).expect("slot capacity is not reachable in benchmarks");
        live.push(key);
        if round % 2 == 1 {
            let victim = live.swap_remove(rng.next_below(live.len()));
            map.remove(victim).expect("victim came from the live set");
        }
    }

    live
}

/// Build a table with `columns` f32 columns and `rows` rows, every cell
/// written once.
pub fn build_table(columns: usize, rows: usize) -> Table {
    let mut table = Table::new();

    let column_keys: Vec<_> = (0..columns).map(|_| table.create_column().unwrap()).collect();
    for r in 0..rows {
        let row = table.create_row::<f32>().unwrap();
        for (c, &column) in column_keys.iter().enumerate() {
            *table.cell_mut::<f32>(row, column).unwrap() = (r * columns + c) as f32;
        }
    }

    table
}
