//! Benchmarks for timestamp-to-cycle assignment

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cycle_stats::core::{Cycle, CycleId, Event};
use cycle_stats::process::{CycleDataJoiner, IntervalIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Contiguous cycles of random length, optionally with overlapping stragglers
fn generate_cycles(n: usize, overlapping: bool, rng: &mut ChaCha8Rng) -> Vec<Cycle> {
    let mut t = 0;
    let mut cycles = Vec::with_capacity(n);
    for i in 0..n {
        let len = rng.gen_range(50..150);
        let end = if overlapping && i % 10 == 0 { t + 3 * len } else { t + len };
        cycles.push(Cycle::complete(i as CycleId, t, end));
        t += len;
    }
    cycles
}

fn generate_probes(n: usize, horizon: i64, rng: &mut ChaCha8Rng) -> Vec<i64> {
    (0..n).map(|_| rng.gen_range(0..horizon)).collect()
}

fn linear_scan(cycles: &[Cycle], t: i64) -> Option<CycleId> {
    cycles.iter().find(|c| c.contains(t)).map(|c| c.cycle_id)
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("interval_lookup");
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for &n in &[100, 1_000, 10_000] {
        for overlapping in [false, true] {
            let cycles = generate_cycles(n, overlapping, &mut rng);
            let horizon = cycles.last().and_then(|c| c.end_time).unwrap_or(1);
            let probes = generate_probes(1_000, horizon, &mut rng);
            let index = IntervalIndex::new(&cycles);
            let label = format!("{n}_cycles_{}", if overlapping { "overlapping" } else { "disjoint" });

            group.bench_with_input(BenchmarkId::new("index", &label), &probes, |b, probes| {
                b.iter(|| {
                    for &t in probes {
                        black_box(index.lookup(t));
                    }
                });
            });

            if n <= 1_000 {
                group.bench_with_input(BenchmarkId::new("linear_scan", &label), &probes, |b, probes| {
                    b.iter(|| {
                        for &t in probes {
                            black_box(linear_scan(&cycles, t));
                        }
                    });
                });
            }
        }
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle_aggregates");
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let cycles = generate_cycles(1_000, false, &mut rng);
    let horizon = cycles.last().and_then(|c| c.end_time).unwrap_or(1);
    let joiner = CycleDataJoiner::new(cycles);

    for &n in &[10_000, 100_000] {
        let mut times = generate_probes(n, horizon, &mut rng);
        times.sort_unstable();
        let events: Vec<Event> = times
            .into_iter()
            .map(|t| Event::float(t, "force", rng.gen_range(0.0..10.0)))
            .collect();

        group.bench_with_input(BenchmarkId::new("sequential", n), &events, |b, events| {
            b.iter(|| black_box(joiner.aggregate(events)));
        });

        #[cfg(feature = "parallel")]
        group.bench_with_input(BenchmarkId::new("parallel", n), &events, |b, events| {
            b.iter(|| black_box(joiner.aggregate_parallel(events)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lookup, bench_aggregate);
criterion_main!(benches);
