//! Non-normative strategy suggestions from the shape of the data
//!
//! The heuristic only looks at which value kinds occur, whether booleans
//! toggle, and how many distinct integers appear. It is a starting point for
//! choosing a configuration, not a guarantee that the strategy fits.

use cycles_core::{signal_events, Event, Strategy, Value, ValueKind};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Largest number of distinct integers still read as a step counter
const MAX_STEP_VALUES: usize = 20;

/// What the heuristic saw in the data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataCharacteristics {
    pub row_count: usize,
    pub value_kinds: BTreeSet<ValueKind>,
    pub separate_start_end: bool,
    pub boolean_transitions: usize,
    pub distinct_integers: usize,
}

impl DataCharacteristics {
    pub fn has(&self, kind: ValueKind) -> bool {
        self.value_kinds.contains(&kind)
    }
}

/// One recommended strategy and the reason for it
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub strategy: Strategy,
    pub reason: String,
}

/// Ordered recommendations, best first
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySuggestions {
    pub characteristics: DataCharacteristics,
    pub recommendations: Vec<Recommendation>,
}

impl StrategySuggestions {
    pub fn best(&self) -> Option<&Strategy> {
        self.recommendations.first().map(|r| &r.strategy)
    }
}

impl fmt::Display for StrategySuggestions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strategy suggestions ({} rows):", self.characteristics.row_count)?;
        for (i, rec) in self.recommendations.iter().enumerate() {
            writeln!(f, "  {}. {} - {}", i + 1, rec.strategy.kind(), rec.reason)?;
        }
        Ok(())
    }
}

/// Suggest strategies for cycles delimited by `start_signal` (and `end_signal`
/// when the end is carried by a different signal)
pub fn suggest_strategies(
    events: &[Event],
    start_signal: &str,
    end_signal: Option<&str>,
) -> StrategySuggestions {
    let selected = signal_events(events, start_signal);
    let characteristics = characterize(&selected, start_signal, end_signal);
    let signal = start_signal.to_string();
    let mut recommendations = Vec::new();

    if let (true, Some(end)) = (characteristics.separate_start_end, end_signal) {
        recommendations.push(Recommendation {
            strategy: Strategy::SeparateStartEnd {
                start_signal: signal.clone(),
                end_signal: end.to_string(),
            },
            reason: "separate start and end signals".to_string(),
        });
    }

    if characteristics.boolean_transitions > 0 {
        recommendations.push(Recommendation {
            strategy: Strategy::PersistentState {
                signal: signal.clone(),
                close_on_next_start: false,
            },
            reason: format!(
                "{} boolean transitions, suitable for persistent cycles",
                characteristics.boolean_transitions
            ),
        });
        recommendations.push(Recommendation {
            strategy: Strategy::TriggerEdge { signal: signal.clone() },
            reason: "boolean data present, can use trigger-based extraction".to_string(),
        });
    }

    if (2..=MAX_STEP_VALUES).contains(&characteristics.distinct_integers) {
        let steps = selected.iter().filter_map(|e| e.value.as_int());
        if let (Some(first), Some(last)) = (steps.clone().min(), steps.max()) {
            recommendations.push(Recommendation {
                strategy: Strategy::StepSequence {
                    signal: signal.clone(),
                    start_step: first,
                    end_step: last,
                },
                reason: format!(
                    "integer data with {} distinct values suggests a step sequence",
                    characteristics.distinct_integers
                ),
            });
        }
    }

    let has_int = characteristics.has(ValueKind::Int);
    let has_str = characteristics.has(ValueKind::Str);
    if has_int || has_str || characteristics.has(ValueKind::Float) {
        recommendations.push(Recommendation {
            strategy: Strategy::ValueChangeThreshold { signal: signal.clone() },
            reason: "changing values, suitable for value change detection".to_string(),
        });
    }

    if has_int || has_str {
        recommendations.push(Recommendation {
            strategy: Strategy::StateChange { signal: signal.clone() },
            reason: "discrete values, suitable for state change detection".to_string(),
        });
    }

    if recommendations.is_empty() {
        recommendations.push(Recommendation {
            strategy: Strategy::ValueChangeThreshold { signal },
            reason: "no clear pattern, value change is the most general option".to_string(),
        });
    }

    StrategySuggestions {
        characteristics,
        recommendations,
    }
}

fn characterize(
    selected: &[&Event],
    start_signal: &str,
    end_signal: Option<&str>,
) -> DataCharacteristics {
    let value_kinds = selected.iter().map(|e| e.value.kind()).collect();
    let bools: Vec<bool> = selected
        .iter()
        .filter_map(|e| match e.value {
            Value::Bool(b) => Some(b),
            _ => None,
        })
        .collect();
    let boolean_transitions = bools.windows(2).filter(|w| w[0] != w[1]).count();
    let distinct_integers = selected
        .iter()
        .filter_map(|e| e.value.as_int())
        .collect::<HashSet<_>>()
        .len();

    DataCharacteristics {
        row_count: selected.len(),
        value_kinds,
        separate_start_end: end_signal.is_some_and(|end| end != start_signal),
        boolean_transitions,
        distinct_integers,
    }
}
