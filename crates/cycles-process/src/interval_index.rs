//! Immutable point-in-interval index over cycle ranges
//!
//! Entries are `[start, end)` ranges of complete cycles sorted by start. A
//! lookup binary-searches the rightmost entry starting at or before `t`.
//!
//! When ranges overlap, a prefix maximum of the end times finds the
//! earliest-starting entry that still contains `t`, and a sparse table over
//! the end times answers whether a later entry contains `t` too. Both are
//! O(log n) per lookup after an O(n log n) build.

use cycles_core::{Cycle, CycleId, CycleState, IncompletePolicy, Timestamp};
use tracing::{debug, instrument};

/// End used for open-ended incomplete cycles
pub const OPEN_END: Timestamp = Timestamp::MAX;

/// One indexed range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub start: Timestamp,
    /// Exclusive; [`OPEN_END`] for open-ended incomplete cycles
    pub end: Timestamp,
    pub cycle_id: CycleId,
}

impl IndexEntry {
    pub fn contains(&self, t: Timestamp) -> bool {
        self.start <= t && t < self.end
    }
}

/// Outcome of a point lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Earliest-starting cycle containing `t`; `ambiguous` when others contain it too
    Assigned { cycle_id: CycleId, ambiguous: bool },
    /// `t` is in a gap, before the first cycle or past the last one
    Unassigned,
}

impl Lookup {
    pub fn cycle_id(&self) -> Option<CycleId> {
        match self {
            Lookup::Assigned { cycle_id, .. } => Some(*cycle_id),
            Lookup::Unassigned => None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Lookup::Assigned { ambiguous: true, .. })
    }
}

/// Range-maximum table over entry end times
#[derive(Debug, Clone)]
struct SparseMax {
    levels: Vec<Vec<Timestamp>>,
}

impl SparseMax {
    fn new(values: &[Timestamp]) -> Self {
        let mut levels = vec![values.to_vec()];
        let mut width = 1;
        while width * 2 <= values.len() {
            let prev = &levels[levels.len() - 1];
            let next: Vec<Timestamp> = (0..=values.len() - width * 2)
                .map(|i| prev[i].max(prev[i + width]))
                .collect();
            levels.push(next);
            width *= 2;
        }
        Self { levels }
    }

    /// Maximum over `lo..hi`, `lo < hi`
    fn max(&self, lo: usize, hi: usize) -> Timestamp {
        let level = (hi - lo).ilog2() as usize;
        let row = &self.levels[level];
        row[lo].max(row[hi - (1 << level)])
    }
}

/// Immutable index answering "which cycle owns timestamp `t`"
#[derive(Debug, Clone)]
pub struct IntervalIndex {
    entries: Vec<IndexEntry>,
    prefix_max_end: Vec<Timestamp>,
    /// Present only when some ranges overlap
    ends: Option<SparseMax>,
    policy: IncompletePolicy,
}

impl IntervalIndex {
    /// Index over complete cycles; incomplete cycles own nothing
    pub fn new(cycles: &[Cycle]) -> Self {
        Self::with_policy(cycles, IncompletePolicy::Exclude)
    }

    /// Index with an explicit treatment of incomplete cycles
    #[instrument(skip(cycles), fields(cycles = cycles.len()))]
    pub fn with_policy(cycles: &[Cycle], policy: IncompletePolicy) -> Self {
        let mut entries: Vec<IndexEntry> = cycles
            .iter()
            .filter_map(|c| match (c.state(), policy) {
                (CycleState::Complete { start, end }, _) if end > start => Some(IndexEntry {
                    start,
                    end,
                    cycle_id: c.cycle_id,
                }),
                (CycleState::Incomplete { start }, IncompletePolicy::OpenEnded) => {
                    Some(IndexEntry {
                        start,
                        end: OPEN_END,
                        cycle_id: c.cycle_id,
                    })
                }
                _ => None,
            })
            .collect();
        // Stable: equal starts keep assembly order
        entries.sort_by_key(|e| e.start);

        let prefix_max_end: Vec<Timestamp> = entries
            .iter()
            .scan(Timestamp::MIN, |max, e| {
                *max = (*max).max(e.end);
                Some(*max)
            })
            .collect();
        let overlapping = entries
            .iter()
            .skip(1)
            .zip(&prefix_max_end)
            .any(|(e, &prev_max)| e.start < prev_max);
        let ends = overlapping.then(|| {
            SparseMax::new(&entries.iter().map(|e| e.end).collect::<Vec<_>>())
        });

        debug!(
            entries = entries.len(),
            overlapping, "built interval index"
        );
        Self {
            entries,
            prefix_max_end,
            ends,
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in start order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Whether any two indexed ranges overlap
    pub fn has_overlaps(&self) -> bool {
        self.ends.is_some()
    }

    pub fn policy(&self) -> IncompletePolicy {
        self.policy
    }

    /// Owning cycle of `t`, if any
    pub fn lookup(&self, t: Timestamp) -> Option<CycleId> {
        self.lookup_detailed(t).cycle_id()
    }

    /// Owning cycle of `t` with the ambiguity diagnostic
    pub fn lookup_detailed(&self, t: Timestamp) -> Lookup {
        // Entries [0, upper) start at or before t
        let upper = self.entries.partition_point(|e| e.start <= t);
        if upper == 0 {
            return Lookup::Unassigned;
        }

        let Some(ends) = &self.ends else {
            let candidate = &self.entries[upper - 1];
            return if t < candidate.end {
                Lookup::Assigned {
                    cycle_id: candidate.cycle_id,
                    ambiguous: false,
                }
            } else {
                Lookup::Unassigned
            };
        };

        let first = self.prefix_max_end[..upper].partition_point(|&m| m <= t);
        if first == upper {
            return Lookup::Unassigned;
        }
        let ambiguous = first + 1 < upper && ends.max(first + 1, upper) > t;
        Lookup::Assigned {
            cycle_id: self.entries[first].cycle_id,
            ambiguous,
        }
    }

    /// Lookups for a batch of timestamps, in input order
    pub fn lookup_many(&self, timestamps: &[Timestamp]) -> Vec<Lookup> {
        timestamps.iter().map(|&t| self.lookup_detailed(t)).collect()
    }

    /// Same result as [`IntervalIndex::lookup_many`], computed on the rayon pool
    #[cfg(feature = "parallel")]
    pub fn lookup_many_parallel(&self, timestamps: &[Timestamp]) -> Vec<Lookup> {
        use rayon::prelude::*;

        timestamps
            .par_iter()
            .map(|&t| self.lookup_detailed(t))
            .collect()
    }
}
