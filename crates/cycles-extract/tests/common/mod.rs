//! Common fixtures for cycles-extract tests

#![allow(dead_code)]

use cycles_core::{CycleConfig, Event, Strategy, Timestamp};

/// Boolean level series of one signal
pub fn levels(signal: &str, samples: &[(Timestamp, bool)]) -> Vec<Event> {
    samples.iter().map(|&(t, v)| Event::bool(t, signal, v)).collect()
}

/// Numeric series sampled at `t = 0, 1, 2, ...`
pub fn floats(signal: &str, values: &[f64]) -> Vec<Event> {
    values
        .iter()
        .enumerate()
        .map(|(t, &v)| Event::float(t as Timestamp, signal, v))
        .collect()
}

/// Machine running signal with rising edges at 0, 10, 25 and falling edges at 8, 22
pub fn machine_run() -> Vec<Event> {
    levels(
        "machine_running",
        &[
            (0, true),
            (8, false),
            (10, true),
            (15, true),
            (22, false),
            (25, true),
        ],
    )
}

pub fn persistent_config(signal: &str) -> CycleConfig {
    CycleConfig::new(Strategy::PersistentState {
        signal: signal.to_string(),
        close_on_next_start: false,
    })
}

pub fn value_change_config(signal: &str, threshold: f64) -> CycleConfig {
    let mut config = CycleConfig::new(Strategy::ValueChangeThreshold {
        signal: signal.to_string(),
    });
    config.value_change_threshold = threshold;
    config
}
