//! Configuration types for cycle extraction and processing
//!
//! All checks run when a configuration is built or loaded, so a component
//! that holds a [`CycleConfig`] never discovers a bad setting mid-run.

use crate::cycle::CycleId;
use crate::error::{Error, Result};
use crate::time::{deserialize_duration, Duration, Timestamp, NANOS_PER_SECOND};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Boundary detection strategy, with the signals it reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// Boolean level: rising edge starts, falling edge ends.
    ///
    /// With `close_on_next_start` only rising edges are used and each cycle
    /// runs until the next one starts.
    PersistentState {
        signal: String,
        #[serde(default)]
        close_on_next_start: bool,
    },
    /// Boolean pulse: each pulse ends the previous cycle and starts the next
    TriggerEdge { signal: String },
    /// Rising edge of one signal starts, rising edge of another ends
    SeparateStartEnd { start_signal: String, end_signal: String },
    /// Integer step counter reaching `start_step` / `end_step`
    StepSequence {
        signal: String,
        start_step: i64,
        end_step: i64,
    },
    /// Any value change on a discrete signal starts a new cycle
    StateChange { signal: String },
    /// A change larger than `value_change_threshold` starts a new cycle
    ValueChangeThreshold { signal: String },
}

/// Strategy name without its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    PersistentState,
    TriggerEdge,
    SeparateStartEnd,
    StepSequence,
    StateChange,
    ValueChangeThreshold,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 6] = [
        StrategyKind::PersistentState,
        StrategyKind::TriggerEdge,
        StrategyKind::SeparateStartEnd,
        StrategyKind::StepSequence,
        StrategyKind::StateChange,
        StrategyKind::ValueChangeThreshold,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::PersistentState => "persistent_state",
            StrategyKind::TriggerEdge => "trigger_edge",
            StrategyKind::SeparateStartEnd => "separate_start_end",
            StrategyKind::StepSequence => "step_sequence",
            StrategyKind::StateChange => "state_change",
            StrategyKind::ValueChangeThreshold => "value_change_threshold",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StrategyKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::InvalidConfiguration(format!("unknown strategy '{s}'")))
    }
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::PersistentState { .. } => StrategyKind::PersistentState,
            Strategy::TriggerEdge { .. } => StrategyKind::TriggerEdge,
            Strategy::SeparateStartEnd { .. } => StrategyKind::SeparateStartEnd,
            Strategy::StepSequence { .. } => StrategyKind::StepSequence,
            Strategy::StateChange { .. } => StrategyKind::StateChange,
            Strategy::ValueChangeThreshold { .. } => StrategyKind::ValueChangeThreshold,
        }
    }

    /// Whether each cycle ends where the next one starts
    pub fn is_contiguous(&self) -> bool {
        match self {
            Strategy::PersistentState {
                close_on_next_start, ..
            } => *close_on_next_start,
            Strategy::StateChange { .. } | Strategy::ValueChangeThreshold { .. } => true,
            Strategy::TriggerEdge { .. }
            | Strategy::SeparateStartEnd { .. }
            | Strategy::StepSequence { .. } => false,
        }
    }

    /// Signals the strategy reads
    pub fn signals(&self) -> Vec<&str> {
        match self {
            Strategy::SeparateStartEnd {
                start_signal,
                end_signal,
            } => vec![start_signal.as_str(), end_signal.as_str()],
            Strategy::PersistentState { signal, .. }
            | Strategy::TriggerEdge { signal }
            | Strategy::StepSequence { signal, .. }
            | Strategy::StateChange { signal }
            | Strategy::ValueChangeThreshold { signal } => vec![signal.as_str()],
        }
    }

    /// Reject parameter combinations that can never produce cycles
    pub fn validate(&self) -> Result<()> {
        if let Some(empty) = self.signals().iter().find(|s| s.trim().is_empty()) {
            return Err(Error::InvalidConfiguration(format!(
                "strategy {} has an empty signal id '{empty}'",
                self.kind()
            )));
        }
        match self {
            Strategy::SeparateStartEnd {
                start_signal,
                end_signal,
            } if start_signal == end_signal => Err(Error::InvalidConfiguration(format!(
                "separate_start_end needs two distinct signals, got '{start_signal}' twice"
            ))),
            Strategy::StepSequence {
                start_step,
                end_step,
                ..
            } if start_step == end_step => Err(Error::InvalidConfiguration(format!(
                "step_sequence start_step and end_step are both {start_step}"
            ))),
            _ => Ok(()),
        }
    }
}

/// What to do with overlapping cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Mark both members, remove nothing
    #[default]
    Flag,
    /// Keep the earliest-starting cycle of each cluster
    KeepFirst,
    /// Keep the latest-starting cycle of each cluster
    KeepLast,
    /// Keep the longest cycle of each cluster
    KeepLongest,
}

impl OverlapPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            OverlapPolicy::Flag => "flag",
            OverlapPolicy::KeepFirst => "keep_first",
            OverlapPolicy::KeepLast => "keep_last",
            OverlapPolicy::KeepLongest => "keep_longest",
        }
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OverlapPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "flag" => Ok(OverlapPolicy::Flag),
            "keep_first" => Ok(OverlapPolicy::KeepFirst),
            "keep_last" => Ok(OverlapPolicy::KeepLast),
            "keep_longest" => Ok(OverlapPolicy::KeepLongest),
            other => Err(Error::InvalidConfiguration(format!(
                "unknown overlap policy '{other}', expected flag, keep_first, keep_last or keep_longest"
            ))),
        }
    }
}

/// How incomplete cycles are treated by interval lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncompletePolicy {
    /// Incomplete cycles own no timestamps
    #[default]
    Exclude,
    /// An incomplete cycle owns `[start, +inf)`
    OpenEnded,
}

impl IncompletePolicy {
    pub fn from_open_ended(open_ended: bool) -> Self {
        if open_ended {
            IncompletePolicy::OpenEnded
        } else {
            IncompletePolicy::Exclude
        }
    }
}

fn default_min_duration() -> Duration {
    NANOS_PER_SECOND
}

fn default_max_duration() -> Duration {
    3_600 * NANOS_PER_SECOND
}

/// Full configuration of one extraction and processing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleConfig {
    pub strategy: Strategy,
    /// Minimum numeric change that counts as significant (absolute value is used)
    #[serde(default)]
    pub value_change_threshold: f64,
    /// Shortest valid cycle (default one second)
    #[serde(default = "default_min_duration", deserialize_with = "deserialize_duration")]
    pub min_duration: Duration,
    /// Longest valid cycle (default one hour)
    #[serde(default = "default_max_duration", deserialize_with = "deserialize_duration")]
    pub max_duration: Duration,
    #[serde(default)]
    pub overlap_policy: OverlapPolicy,
    /// Treat incomplete cycles as `[start, +inf)` during lookups
    #[serde(default)]
    pub open_ended_incomplete: bool,
    /// Known end of the dataset; closes the last contiguous cycle
    #[serde(default)]
    pub dataset_end: Option<Timestamp>,
    /// Identifier given to the first assembled cycle
    #[serde(default)]
    pub first_cycle_id: CycleId,
}

impl CycleConfig {
    /// Configuration with defaults for everything but the strategy
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            value_change_threshold: 0.0,
            min_duration: default_min_duration(),
            max_duration: default_max_duration(),
            overlap_policy: OverlapPolicy::default(),
            open_ended_incomplete: false,
            dataset_end: None,
            first_cycle_id: 0,
        }
    }

    pub fn builder(strategy: Strategy) -> CycleConfigBuilder {
        CycleConfigBuilder::new(strategy)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CycleConfig = serde_json::from_str(json).map_err(|e| match e.classify() {
            serde_json::error::Category::Data => Error::InvalidConfiguration(e.to_string()),
            _ => Error::Serialization(e),
        })?;
        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn incomplete_policy(&self) -> IncompletePolicy {
        IncompletePolicy::from_open_ended(self.open_ended_incomplete)
    }

    fn normalized(mut self) -> Self {
        self.value_change_threshold = self.value_change_threshold.abs();
        self
    }

    /// Check every constraint that does not depend on the data
    pub fn validate(&self) -> Result<()> {
        self.strategy.validate()?;
        if !self.value_change_threshold.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "value_change_threshold must be finite, got {}",
                self.value_change_threshold
            )));
        }
        validate_duration_bounds(self.min_duration, self.max_duration)
    }
}

/// `0 <= min_duration <= max_duration`
pub fn validate_duration_bounds(min_duration: Duration, max_duration: Duration) -> Result<()> {
    if min_duration < 0 || max_duration < 0 {
        return Err(Error::InvalidConfiguration(format!(
            "durations must be non-negative, got min {min_duration} and max {max_duration}"
        )));
    }
    if min_duration > max_duration {
        return Err(Error::InvalidConfiguration(format!(
            "min_duration ({min_duration}) is greater than max_duration ({max_duration})"
        )));
    }
    Ok(())
}

/// Builder for [`CycleConfig`]
#[derive(Debug, Clone)]
pub struct CycleConfigBuilder {
    config: CycleConfig,
}

impl CycleConfigBuilder {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            config: CycleConfig::new(strategy),
        }
    }

    /// Sets the significance threshold; the sign is ignored.
    pub fn value_change_threshold(mut self, threshold: f64) -> Self {
        self.config.value_change_threshold = threshold;
        self
    }

    pub fn min_duration(mut self, ticks: Duration) -> Self {
        self.config.min_duration = ticks;
        self
    }

    pub fn max_duration(mut self, ticks: Duration) -> Self {
        self.config.max_duration = ticks;
        self
    }

    pub fn duration_bounds(self, min: Duration, max: Duration) -> Self {
        self.min_duration(min).max_duration(max)
    }

    pub fn overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.config.overlap_policy = policy;
        self
    }

    pub fn open_ended_incomplete(mut self, open_ended: bool) -> Self {
        self.config.open_ended_incomplete = open_ended;
        self
    }

    pub fn dataset_end(mut self, end: Timestamp) -> Self {
        self.config.dataset_end = Some(end);
        self
    }

    pub fn first_cycle_id(mut self, id: CycleId) -> Self {
        self.config.first_cycle_id = id;
        self
    }

    pub fn build(self) -> Result<CycleConfig> {
        let config = self.config.normalized();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press() -> Strategy {
        Strategy::PersistentState {
            signal: "press".into(),
            close_on_next_start: false,
        }
    }

    #[test]
    fn test_builder_defaults() {
        let config = CycleConfig::builder(press()).build().unwrap();
        assert_eq!(config.value_change_threshold, 0.0);
        assert_eq!(config.min_duration, NANOS_PER_SECOND);
        assert_eq!(config.max_duration, 3_600 * NANOS_PER_SECOND);
        assert_eq!(config.overlap_policy, OverlapPolicy::Flag);
        assert_eq!(config.incomplete_policy(), IncompletePolicy::Exclude);
    }

    #[test]
    fn test_builder_rejects_inverted_bounds() {
        let err = CycleConfig::builder(press()).duration_bounds(10, 5).build().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_threshold_sign_is_ignored() {
        let config = CycleConfig::builder(Strategy::ValueChangeThreshold { signal: "temp".into() })
            .value_change_threshold(-2.0)
            .build()
            .unwrap();
        assert_eq!(config.value_change_threshold, 2.0);

        let err = CycleConfig::builder(Strategy::ValueChangeThreshold { signal: "temp".into() })
            .value_change_threshold(f64::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_strategy_validation() {
        let same = Strategy::SeparateStartEnd {
            start_signal: "a".into(),
            end_signal: "a".into(),
        };
        assert!(same.validate().is_err());

        let steps = Strategy::StepSequence {
            signal: "step".into(),
            start_step: 3,
            end_step: 3,
        };
        assert!(steps.validate().is_err());

        let blank = Strategy::TriggerEdge { signal: " ".into() };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_contiguous_classification() {
        assert!(!press().is_contiguous());
        assert!(Strategy::PersistentState {
            signal: "press".into(),
            close_on_next_start: true
        }
        .is_contiguous());
        assert!(Strategy::StateChange { signal: "s".into() }.is_contiguous());
        assert!(!Strategy::TriggerEdge { signal: "s".into() }.is_contiguous());
    }

    #[test]
    fn test_names_parse() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.name().parse::<StrategyKind>().unwrap(), kind);
        }
        assert!("duck_typing".parse::<StrategyKind>().is_err());
        assert_eq!("keep_longest".parse::<OverlapPolicy>().unwrap(), OverlapPolicy::KeepLongest);
        assert!("keep_all".parse::<OverlapPolicy>().is_err());
    }

    #[test]
    fn test_json_config() {
        let json = r#"{
            "strategy": { "kind": "step_sequence", "signal": "step", "start_step": 1, "end_step": 4 },
            "min_duration": "5s",
            "max_duration": 120000000000,
            "overlap_policy": "keep_first",
            "open_ended_incomplete": true
        }"#;
        let config = CycleConfig::from_json_str(json).unwrap();
        assert_eq!(config.strategy.kind(), StrategyKind::StepSequence);
        assert_eq!(config.min_duration, 5 * NANOS_PER_SECOND);
        assert_eq!(config.max_duration, 120 * NANOS_PER_SECOND);
        assert_eq!(config.overlap_policy, OverlapPolicy::KeepFirst);
        assert_eq!(config.incomplete_policy(), IncompletePolicy::OpenEnded);
    }

    #[test]
    fn test_json_unknown_strategy_is_configuration_error() {
        let json = r#"{ "strategy": { "kind": "magic", "signal": "x" } }"#;
        assert!(matches!(
            CycleConfig::from_json_str(json),
            Err(Error::InvalidConfiguration(_))
        ));

        let json = r#"{ "strategy": { "kind": "state_change", "signal": "x" }, "min_duration": "1h", "max_duration": "1m" }"#;
        assert!(matches!(
            CycleConfig::from_json_str(json),
            Err(Error::InvalidConfiguration(_))
        ));

        assert!(matches!(CycleConfig::from_json_str("{"), Err(Error::Serialization(_))));
    }
}
