//! Common fixtures for cycles-process tests

#![allow(dead_code)]

use cycles_core::{Cycle, CycleId, Timestamp};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random table of complete cycles that may overlap, ids in start order
pub fn random_cycles(seed: u64, n: usize, horizon: Timestamp) -> Vec<Cycle> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut starts: Vec<Timestamp> = (0..n).map(|_| rng.gen_range(0..horizon)).collect();
    starts.sort_unstable();
    starts
        .into_iter()
        .enumerate()
        .map(|(i, start)| Cycle::complete(i as CycleId, start, start + rng.gen_range(0..horizon / 10 + 1)))
        .collect()
}

/// Contiguous tiling `[b0, b1), [b1, b2), ...` from positive gaps
pub fn tiled_cycles(gaps: &[Timestamp]) -> Vec<Cycle> {
    let mut t = 0;
    gaps.iter()
        .enumerate()
        .map(|(i, &gap)| {
            let cycle = Cycle::complete(i as CycleId, t, t + gap);
            t += gap;
            cycle
        })
        .collect()
}

/// Strategy for small cycle tables mixing complete, zero-length and incomplete rows
pub fn cycle_table() -> impl Strategy<Value = Vec<Cycle>> {
    prop::collection::vec((0i64..200, 0i64..60, 0u8..10), 0..60).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (start, len, kind))| {
                if kind == 0 {
                    Cycle::incomplete(i as CycleId, start)
                } else {
                    Cycle::complete(i as CycleId, start, start + len)
                }
            })
            .collect()
    })
}

/// Every cycle containing `t`, by brute force
pub fn owners(cycles: &[Cycle], t: Timestamp) -> Vec<CycleId> {
    cycles
        .iter()
        .filter(|c| c.contains(t))
        .map(|c| c.cycle_id)
        .collect()
}
