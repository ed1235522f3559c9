use overlap_fit::{fit_points, FitOpts};
use overlap_mc::{run_sweep, SeedPolicy, SweepConfig};

#[test]
fn fitted_curve_rises_with_density() {
    let config = SweepConfig {
        bin_count: 100,
        max_entities: 200,
        trials_per_step: 200,
        step_size: 10,
        start_entities: 2,
        seed_policy: SeedPolicy {
            master_seed: 314_159,
            label: None,
        },
        ..SweepConfig::default()
    };
    let report = run_sweep(&config).expect("sweep");
    let fit = fit_points(&report.points, &FitOpts::default()).expect("fit");

    let (lo, hi) = fit.domain;
    let grid: Vec<f64> = (0..200).map(|i| lo + (hi - lo) * i as f64 / 199.0).collect();
    for pair in grid.windows(2) {
        assert!(
            fit.evaluate(pair[1]) >= fit.evaluate(pair[0]),
            "fitted curve decreases between {} and {}",
            pair[0],
            pair[1]
        );
    }
    for point in &report.points {
        assert!((fit.evaluate(point.density) - point.probability).abs() < 0.05);
    }
}
