use criterion::{criterion_group, criterion_main, Criterion};

use overlap_mc::{aggregate_trials, run_sweep, SweepConfig};

fn bench_trials(c: &mut Criterion) {
    c.bench_function("aggregate_trials_k500_n1000", |b| {
        b.iter(|| aggregate_trials(500, 1000, 100, 42).unwrap())
    });
}

fn bench_sweep(c: &mut Criterion) {
    let config = SweepConfig {
        bin_count: 1000,
        max_entities: 2000,
        trials_per_step: 20,
        step_size: 250,
        ..SweepConfig::default()
    };
    c.bench_function("probability_sweep", |b| {
        b.iter(|| run_sweep(&config).unwrap())
    });
}

criterion_group!(benches, bench_trials, bench_sweep);
criterion_main!(benches);
