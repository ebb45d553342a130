//! Overlap detection and policy-driven pruning
//!
//! Two cycles overlap when `a.start < b.end && b.start < a.end`. Only complete
//! cycles with a positive duration take part; incomplete and zero-length
//! cycles are annotated `has_overlap = false` and are never dropped.
//!
//! Detection is a sweep over cycles sorted by start with a min-heap of the
//! active end times, O(n log n). Overlapping cycles form clusters (connected
//! components of the overlap relation); the keep policies retain one cycle
//! per cluster.

use cycles_core::{Cycle, CycleConfig, CycleId, CycleState, OverlapPolicy, Timestamp};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::fmt;
use tracing::{info, instrument, warn};

/// Summary of one detection or resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverlapReport {
    /// Number of unordered overlapping pairs
    pub overlapping_pairs: usize,
    /// Cycles that overlap at least one other cycle
    pub overlapping_cycles: usize,
    /// Clusters with two or more members
    pub clusters: usize,
    /// Ids removed by the policy, in input order
    pub dropped: Vec<CycleId>,
}

impl fmt::Display for OverlapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} overlapping pairs across {} clusters, {} cycles dropped",
            self.overlapping_pairs,
            self.clusters,
            self.dropped.len()
        )
    }
}

/// Annotated (and possibly pruned) cycle table
#[derive(Debug, Clone)]
pub struct OverlapResolution {
    pub cycles: Vec<Cycle>,
    pub report: OverlapReport,
}

/// Result of the sweep, indexed by input position
struct Sweep {
    flagged: Vec<bool>,
    participates: Vec<bool>,
    /// Clusters of two or more, members in `(start, input order)`
    clusters: Vec<Vec<usize>>,
    pairs: usize,
}

fn sweep(cycles: &[Cycle]) -> Sweep {
    let mut order: Vec<(Timestamp, Timestamp, usize)> = cycles
        .iter()
        .enumerate()
        .filter_map(|(i, c)| match c.state() {
            CycleState::Complete { start, end } if end > start => Some((start, end, i)),
            _ => None,
        })
        .collect();
    order.sort_by_key(|&(start, _, i)| (start, i));

    let mut participates = vec![false; cycles.len()];
    let mut active: BinaryHeap<Reverse<Timestamp>> = BinaryHeap::new();
    let mut pairs = 0;
    let mut clusters = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut cluster_end = Timestamp::MIN;

    for &(start, end, i) in &order {
        participates[i] = true;
        while active.peek().is_some_and(|Reverse(e)| *e <= start) {
            active.pop();
        }
        // Everything still active ends after `start` and began at or before it
        pairs += active.len();
        active.push(Reverse(end));

        if start >= cluster_end {
            if current.len() > 1 {
                clusters.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            cluster_end = end;
        } else {
            cluster_end = cluster_end.max(end);
        }
        current.push(i);
    }
    if current.len() > 1 {
        clusters.push(current);
    }

    let mut flagged = vec![false; cycles.len()];
    for &i in clusters.iter().flatten() {
        flagged[i] = true;
    }
    Sweep {
        flagged,
        participates,
        clusters,
        pairs,
    }
}

/// Detects overlapping cycles and applies an [`OverlapPolicy`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlapResolver {
    policy: OverlapPolicy,
}

impl OverlapResolver {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &CycleConfig) -> Self {
        Self::new(config.overlap_policy)
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Copies of `cycles` with `has_overlap` set on every row
    #[instrument(skip(self, cycles), fields(cycles = cycles.len()))]
    pub fn detect(&self, cycles: &[Cycle]) -> Vec<Cycle> {
        let sweep = sweep(cycles);
        log_sweep(&sweep);
        annotate(cycles, &sweep)
    }

    /// Detect overlaps, then keep one cycle per cluster under the policy.
    ///
    /// With [`OverlapPolicy::Flag`] nothing is removed. Surviving rows keep
    /// their input order and their `has_overlap` annotation.
    #[instrument(skip(self, cycles), fields(policy = %self.policy, cycles = cycles.len()))]
    pub fn resolve(&self, cycles: &[Cycle]) -> OverlapResolution {
        let sweep = sweep(cycles);
        log_sweep(&sweep);
        let annotated = annotate(cycles, &sweep);

        let dropped: HashSet<usize> = match self.policy {
            OverlapPolicy::Flag => HashSet::new(),
            policy => sweep
                .clusters
                .iter()
                .flat_map(|cluster| {
                    let keep = winner(cycles, cluster, policy);
                    cluster.iter().copied().filter(move |&i| i != keep)
                })
                .collect(),
        };

        let mut report = OverlapReport {
            overlapping_pairs: sweep.pairs,
            overlapping_cycles: sweep.flagged.iter().filter(|&&f| f).count(),
            clusters: sweep.clusters.len(),
            dropped: Vec::with_capacity(dropped.len()),
        };
        let mut kept = Vec::with_capacity(annotated.len() - dropped.len());
        for (i, cycle) in annotated.into_iter().enumerate() {
            if dropped.contains(&i) {
                report.dropped.push(cycle.cycle_id);
            } else {
                kept.push(cycle);
            }
        }

        if !report.dropped.is_empty() {
            info!(
                dropped = report.dropped.len(),
                remaining = kept.len(),
                "removed overlapping cycles"
            );
        }
        OverlapResolution {
            cycles: kept,
            report,
        }
    }
}

fn annotate(cycles: &[Cycle], sweep: &Sweep) -> Vec<Cycle> {
    cycles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let mut out = c.clone();
            out.has_overlap = Some(sweep.participates[i] && sweep.flagged[i]);
            out
        })
        .collect()
}

fn log_sweep(sweep: &Sweep) {
    if sweep.pairs > 0 {
        warn!(
            pairs = sweep.pairs,
            clusters = sweep.clusters.len(),
            "overlapping cycles detected"
        );
    }
}

/// Input position of the cycle a keep policy retains.
///
/// `cluster` is ordered by `(start, input order)`, so the first candidate
/// reached is also the tie-break winner.
fn winner(cycles: &[Cycle], cluster: &[usize], policy: OverlapPolicy) -> usize {
    let start = |i: usize| cycles[i].start_time;
    let span = |i: usize| cycles[i].span().unwrap_or(0);
    let mut best = cluster[0];
    for &i in &cluster[1..] {
        let better = match policy {
            OverlapPolicy::Flag | OverlapPolicy::KeepFirst => false,
            OverlapPolicy::KeepLast => start(i) > start(best),
            OverlapPolicy::KeepLongest => span(i) > span(best),
        };
        if better {
            best = i;
        }
    }
    best
}

/// Copies of `cycles` with `has_overlap` set on every row
pub fn detect_overlaps(cycles: &[Cycle]) -> Vec<Cycle> {
    OverlapResolver::default().detect(cycles)
}

/// Prune `cycles` under `policy`
pub fn resolve_overlaps(cycles: &[Cycle], policy: OverlapPolicy) -> OverlapResolution {
    OverlapResolver::new(policy).resolve(cycles)
}
