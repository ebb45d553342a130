//! Overlap detection and resolution against brute force

mod common;

use common::*;
use cycles_core::{Cycle, CycleId, OverlapPolicy};
use cycles_process::{detect_overlaps, resolve_overlaps, OverlapResolver};
use proptest::prelude::*;
use std::collections::HashSet;

fn ids(cycles: &[Cycle]) -> Vec<CycleId> {
    cycles.iter().map(|c| c.cycle_id).collect()
}

#[test]
fn test_two_equal_cycles_keep_longest() {
    let cycles = vec![Cycle::complete(0, 0, 10), Cycle::complete(1, 5, 15)];
    let detected = OverlapResolver::default().detect(&cycles);
    assert_eq!(detected[0].has_overlap, Some(true));
    assert_eq!(detected[1].has_overlap, Some(true));

    let resolved = OverlapResolver::new(OverlapPolicy::KeepLongest).resolve(&cycles);
    assert_eq!(ids(&resolved.cycles), vec![0]);
    assert_eq!(resolved.report.dropped, vec![1]);
}

#[test]
fn test_chain_forms_one_cluster() {
    // 0-1 and 1-2 overlap, 0-2 do not: still one cluster
    let cycles = vec![
        Cycle::complete(0, 0, 10),
        Cycle::complete(1, 8, 20),
        Cycle::complete(2, 18, 25),
    ];
    let out = resolve_overlaps(&cycles, OverlapPolicy::KeepFirst);
    assert_eq!(out.report.clusters, 1);
    assert_eq!(out.report.overlapping_pairs, 2);
    assert_eq!(ids(&out.cycles), vec![0]);
}

#[test]
fn test_contiguous_tiling_never_overlaps() {
    let cycles = tiled_cycles(&[5, 3, 8, 1, 13]);
    let out = resolve_overlaps(&cycles, OverlapPolicy::KeepLongest);
    assert_eq!(out.cycles.len(), 5);
    assert_eq!(out.report.overlapping_pairs, 0);
    assert!(out.cycles.iter().all(|c| c.has_overlap == Some(false)));
}

#[test]
fn test_large_random_table() {
    let cycles = random_cycles(7, 2_000, 1_000_000);
    let flagged = detect_overlaps(&cycles);
    let resolved = resolve_overlaps(&cycles, OverlapPolicy::KeepLongest);
    let kept: Vec<&Cycle> = resolved.cycles.iter().collect();
    for (i, a) in kept.iter().enumerate() {
        for b in &kept[i + 1..] {
            assert!(!a.overlaps(b), "{a} overlaps {b}");
        }
    }
    assert_eq!(flagged.len(), cycles.len());
}

proptest! {
    // Flags match the pairwise definition exactly
    #[test]
    fn prop_flags_match_brute_force(cycles in cycle_table()) {
        let flagged = detect_overlaps(&cycles);
        let mut pairs = 0;
        for (i, a) in cycles.iter().enumerate() {
            let mut expected = false;
            for (j, b) in cycles.iter().enumerate() {
                if i != j && a.overlaps(b) {
                    expected = true;
                    if i < j {
                        pairs += 1;
                    }
                }
            }
            prop_assert_eq!(flagged[i].has_overlap, Some(expected), "cycle {}", a);
        }
        let report = resolve_overlaps(&cycles, OverlapPolicy::Flag).report;
        prop_assert_eq!(report.overlapping_pairs, pairs);
        prop_assert!(report.dropped.is_empty());
    }

    // Keep policies leave a non-overlapping table and never drop incomplete cycles
    #[test]
    fn prop_keep_policies_remove_all_overlaps(
        cycles in cycle_table(),
        policy in prop_oneof![
            Just(OverlapPolicy::KeepFirst),
            Just(OverlapPolicy::KeepLast),
            Just(OverlapPolicy::KeepLongest),
        ],
    ) {
        let out = resolve_overlaps(&cycles, policy);
        for (i, a) in out.cycles.iter().enumerate() {
            for b in &out.cycles[i + 1..] {
                prop_assert!(!a.overlaps(b));
            }
        }
        let kept: HashSet<CycleId> = out.cycles.iter().map(|c| c.cycle_id).collect();
        for cycle in cycles.iter().filter(|c| !c.is_complete) {
            prop_assert!(kept.contains(&cycle.cycle_id));
        }
        prop_assert_eq!(out.cycles.len() + out.report.dropped.len(), cycles.len());
        // Exactly one survivor per cluster
        prop_assert_eq!(
            out.cycles.iter().filter(|c| c.has_overlap == Some(true)).count(),
            out.report.clusters
        );
    }

    // keep_longest on a single cluster keeps the longest, ties to the earliest start
    #[test]
    fn prop_keep_longest_single_cluster(lens in prop::collection::vec(1i64..50, 2..20)) {
        // All cycles share the instant 0 so they form one cluster
        let cycles: Vec<Cycle> = lens
            .iter()
            .enumerate()
            .map(|(i, &len)| Cycle::complete(i as CycleId, -(i as i64), len))
            .collect();
        let out = resolve_overlaps(&cycles, OverlapPolicy::KeepLongest);
        prop_assert_eq!(out.cycles.len(), 1);

        let best = cycles
            .iter()
            .max_by_key(|c| (c.span(), std::cmp::Reverse(c.start_time)))
            .unwrap();
        prop_assert_eq!(out.cycles[0].cycle_id, best.cycle_id);
    }
}
