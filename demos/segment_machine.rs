//! Segment a synthetic press line and rank its most consistent cycles
//!
//! Run with `RUST_LOG=debug` for per-stage detail, or set
//! `CYCLE_LOG_FORMAT=json` for structured output.

use anyhow::Result;
use cycle_stats::core::{CycleConfig, Event, OverlapPolicy, Strategy};
use cycle_stats::extract::suggest_strategies;
use cycle_stats::process::{CyclePipeline, GoldenCriteria, GoldenMethod};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .from_env_lossy();
    let registry = tracing_subscriber::registry().with(filter);
    match std::env::var("CYCLE_LOG_FORMAT").as_deref() {
        Ok("json") => registry.with(fmt::layer().json().with_target(true)).init(),
        _ => registry.with(fmt::layer().compact().with_target(true)).init(),
    }
}

/// Press cycles of 40-60 ticks with a force reading every 5 ticks
fn press_line(cycles: usize, rng: &mut ChaCha8Rng) -> Vec<Event> {
    let mut events = Vec::new();
    let mut t = 0;
    for _ in 0..cycles {
        let len = rng.gen_range(40..60);
        events.push(Event::bool(t, "press_active", true));
        let target = rng.gen_range(95.0..105.0);
        let noise = rng.gen_range(0.1..5.0);
        for k in (1..len).step_by(5) {
            events.push(Event::float(t + k, "force", target + rng.gen_range(-noise..noise)));
        }
        events.push(Event::bool(t + len, "press_active", false));
        t += len + rng.gen_range(5..20);
    }
    // A final press still running when the capture stopped
    events.push(Event::bool(t, "press_active", true));
    events
}

fn main() -> Result<()> {
    init_logging();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let events = press_line(200, &mut rng);

    let suggestions = suggest_strategies(&events, "press_active", None);
    println!("{suggestions}");

    let config = CycleConfig::builder(Strategy::PersistentState {
        signal: "press_active".into(),
        close_on_next_start: false,
    })
    .duration_bounds(42, 58)
    .overlap_policy(OverlapPolicy::KeepLongest)
    .build()?;
    let out = CyclePipeline::new(config)?.run(&events)?;

    println!("{}", out.stats);
    println!("{}", out.validation);
    println!("{}", out.overlaps);

    let joiner = out.joiner();
    let golden = joiner.golden_cycles(
        &events,
        &GoldenCriteria::new("force", GoldenMethod::LowVariability).with_top_n(3),
    )?;
    for cycle in &golden {
        info!(
            rank = cycle.rank,
            cycle_id = cycle.cycle_id,
            score = cycle.score,
            "golden cycle"
        );
    }

    if let Some(best) = golden.first() {
        for row in joiner.compare_to_reference(&events, best.cycle_id, "force")?.iter().take(5) {
            println!(
                "cycle {:>3}: mean {:.2}, deviation {:+.2}",
                row.cycle_id, row.mean, row.deviation_from_reference
            );
        }
    }
    Ok(())
}
