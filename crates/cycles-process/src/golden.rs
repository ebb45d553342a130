//! Golden-cycle ranking
//!
//! Every method turns a cycle's values of one signal into a distance score;
//! lower is better. Only complete cycles that did not fail validation are
//! ranked. Ties go to the earlier start, then the lower cycle id.

use crate::joiner::{numeric_values, CycleGroups, NumericSummary};
use cycles_core::{Cycle, CycleId, Error, Result, Timestamp};
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// How golden cycles are scored
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "method", content = "target", rename_all = "snake_case")]
pub enum GoldenMethod {
    /// Lowest coefficient of variation `std / |mean|`; needs two values
    LowVariability,
    /// Highest mean
    HighMean,
    /// Mean closest to the target
    TargetValue(f64),
    /// Mean closest to the median of all eligible cycle means
    PopulationCenter,
}

impl GoldenMethod {
    pub fn name(&self) -> &'static str {
        match self {
            GoldenMethod::LowVariability => "low_variability",
            GoldenMethod::HighMean => "high_mean",
            GoldenMethod::TargetValue(_) => "target_value",
            GoldenMethod::PopulationCenter => "population_center",
        }
    }
}

impl fmt::Display for GoldenMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoldenMethod::TargetValue(t) => write!(f, "target_value({t})"),
            other => f.write_str(other.name()),
        }
    }
}

/// What to rank and how many to keep
#[derive(Debug, Clone, PartialEq)]
pub struct GoldenCriteria {
    pub signal: String,
    pub method: GoldenMethod,
    pub top_n: usize,
    /// Skip cycles annotated `has_overlap = true`
    pub require_no_overlap: bool,
}

impl GoldenCriteria {
    pub fn new(signal: impl Into<String>, method: GoldenMethod) -> Self {
        Self {
            signal: signal.into(),
            method,
            top_n: 5,
            require_no_overlap: false,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn requiring_no_overlap(mut self) -> Self {
        self.require_no_overlap = true;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(Error::InvalidParameter("top_n must be at least 1".to_string()));
        }
        if let GoldenMethod::TargetValue(t) = self.method {
            if !t.is_finite() {
                return Err(Error::InvalidParameter(format!(
                    "target value must be finite, got {t}"
                )));
            }
        }
        Ok(())
    }

    fn eligible(&self, cycle: &Cycle) -> bool {
        cycle.is_complete
            && cycle.is_valid != Some(false)
            && !(self.require_no_overlap && cycle.has_overlap == Some(true))
    }
}

/// One ranked cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldenCycle {
    /// 1-based rank
    pub rank: usize,
    pub cycle_id: CycleId,
    pub start_time: Timestamp,
    /// Distance score, lower is better
    pub score: f64,
    pub mean: f64,
    pub std: Option<f64>,
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by_key(|&v| OrderedFloat(v));
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

/// Rank eligible cycles of `cycles` by `criteria` using grouped events
pub fn rank_golden_cycles(
    cycles: &[Cycle],
    groups: &CycleGroups<'_>,
    criteria: &GoldenCriteria,
) -> Result<Vec<GoldenCycle>> {
    criteria.validate()?;

    let summaries: Vec<(&Cycle, NumericSummary)> = cycles
        .iter()
        .filter(|c| criteria.eligible(c))
        .filter_map(|c| {
            NumericSummary::of(&numeric_values(groups.get(c.cycle_id), &criteria.signal))
                .map(|s| (c, s))
        })
        .collect();

    let center = match criteria.method {
        GoldenMethod::PopulationCenter => {
            median(&mut summaries.iter().map(|(_, s)| s.mean).collect::<Vec<_>>())
        }
        _ => None,
    };

    let mut scored: Vec<(OrderedFloat<f64>, &Cycle, NumericSummary)> = summaries
        .into_iter()
        .filter_map(|(cycle, s)| {
            let score = match criteria.method {
                GoldenMethod::LowVariability => {
                    let std = s.std?;
                    if s.mean == 0.0 {
                        f64::INFINITY
                    } else {
                        std / s.mean.abs()
                    }
                }
                GoldenMethod::HighMean => -s.mean,
                GoldenMethod::TargetValue(target) => (s.mean - target).abs(),
                GoldenMethod::PopulationCenter => (s.mean - center?).abs(),
            };
            Some((OrderedFloat(score), cycle, s))
        })
        .collect();

    if scored.is_empty() {
        warn!(
            signal = %criteria.signal,
            method = %criteria.method,
            "no eligible cycles with data to rank"
        );
        return Ok(Vec::new());
    }

    scored.sort_by_key(|(score, cycle, _)| (*score, cycle.start_time, cycle.cycle_id));
    let golden: Vec<GoldenCycle> = scored
        .into_iter()
        .take(criteria.top_n)
        .enumerate()
        .map(|(i, (score, cycle, s))| GoldenCycle {
            rank: i + 1,
            cycle_id: cycle.cycle_id,
            start_time: cycle.start_time,
            score: score.into_inner(),
            mean: s.mean,
            std: s.std,
        })
        .collect();

    info!(
        golden = golden.len(),
        method = %criteria.method,
        "identified golden cycles"
    );
    Ok(golden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joiner::CycleDataJoiner;
    use approx::assert_relative_eq;
    use cycles_core::Event;

    /// Four 10-tick cycles with two samples each
    fn fixture() -> (CycleDataJoiner, Vec<Event>) {
        let cycles = (0..4)
            .map(|i| Cycle::complete(i, i as i64 * 10, i as i64 * 10 + 10))
            .collect();
        let samples = [(10.0, 10.2), (12.0, 8.0), (20.0, 20.0), (9.0, 11.0)];
        let events = samples
            .iter()
            .enumerate()
            .flat_map(|(i, &(a, b))| {
                let t = i as i64 * 10;
                [Event::float(t + 1, "temp", a), Event::float(t + 2, "temp", b)]
            })
            .collect();
        (CycleDataJoiner::new(cycles), events)
    }

    fn ids(golden: &[GoldenCycle]) -> Vec<CycleId> {
        golden.iter().map(|g| g.cycle_id).collect()
    }

    #[test]
    fn test_low_variability() {
        let (joiner, events) = fixture();
        let golden = joiner
            .golden_cycles(&events, &GoldenCriteria::new("temp", GoldenMethod::LowVariability))
            .unwrap();
        assert_eq!(ids(&golden), vec![2, 0, 3, 1]);
        assert_eq!(golden[0].score, 0.0);
        assert_eq!(golden[0].rank, 1);
    }

    #[test]
    fn test_high_mean_and_target() {
        let (joiner, events) = fixture();
        let high = joiner
            .golden_cycles(
                &events,
                &GoldenCriteria::new("temp", GoldenMethod::HighMean).with_top_n(1),
            )
            .unwrap();
        assert_eq!(ids(&high), vec![2]);

        // Means are 10.1, 10.0, 20.0, 10.0: the tie at distance 0 goes to the earlier start
        let target = joiner
            .golden_cycles(
                &events,
                &GoldenCriteria::new("temp", GoldenMethod::TargetValue(10.0)).with_top_n(3),
            )
            .unwrap();
        assert_eq!(ids(&target), vec![1, 3, 0]);
        assert_relative_eq!(target[2].score, 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_population_center() {
        let (joiner, events) = fixture();
        let golden = joiner
            .golden_cycles(
                &events,
                &GoldenCriteria::new("temp", GoldenMethod::PopulationCenter),
            )
            .unwrap();
        // Median of [10.0, 10.0, 10.1, 20.0] is 10.05, the outlier ranks last
        assert_eq!(golden.len(), 4);
        assert_eq!(golden[3].cycle_id, 2);
        for g in &golden[..3] {
            assert_relative_eq!(g.score, 0.05, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_ineligible_cycles_skipped() {
        let (joiner, events) = fixture();
        let mut cycles = joiner.cycles().to_vec();
        cycles[2].is_valid = Some(false);
        cycles[0].has_overlap = Some(true);
        let joiner = CycleDataJoiner::new(cycles);

        let golden = joiner
            .golden_cycles(&events, &GoldenCriteria::new("temp", GoldenMethod::HighMean))
            .unwrap();
        assert!(!ids(&golden).contains(&2));
        assert!(ids(&golden).contains(&0));

        let strict = joiner
            .golden_cycles(
                &events,
                &GoldenCriteria::new("temp", GoldenMethod::HighMean).requiring_no_overlap(),
            )
            .unwrap();
        assert_eq!(ids(&strict), vec![1, 3]);
    }

    #[test]
    fn test_invalid_criteria() {
        let (joiner, events) = fixture();
        let err = joiner
            .golden_cycles(
                &events,
                &GoldenCriteria::new("temp", GoldenMethod::HighMean).with_top_n(0),
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert!(joiner
            .golden_cycles(
                &events,
                &GoldenCriteria::new("temp", GoldenMethod::TargetValue(f64::NAN)),
            )
            .is_err());
    }

    #[test]
    fn test_unknown_signal_yields_nothing() {
        let (joiner, events) = fixture();
        let golden = joiner
            .golden_cycles(&events, &GoldenCriteria::new("pressure", GoldenMethod::HighMean))
            .unwrap();
        assert!(golden.is_empty());
    }
}
