use overlap_fit::{fit_polynomial, read_fit_json, write_fit_json, FitOpts};

const QUARTIC: [f64; 5] = [0.5, -2.0, 0.25, 3.0, -1.0];

fn quartic(x: f64) -> f64 {
    QUARTIC.iter().fold(0.0, |acc, c| acc * x + c)
}

#[test]
fn recovers_known_quartic() {
    let xs: Vec<f64> = (0..9).map(|i| i as f64 * 0.5).collect();
    let ys: Vec<f64> = xs.iter().map(|x| quartic(*x)).collect();
    let report = fit_polynomial(&xs, &ys, &FitOpts::default()).expect("fit");

    assert_eq!(report.model.degree(), 4);
    for (fitted, expected) in report.model.coefficients().iter().zip(QUARTIC) {
        assert!((fitted - expected).abs() < 1e-8, "{fitted} vs {expected}");
    }
    for (x, y) in xs.iter().zip(&ys) {
        assert!((report.evaluate(*x) - y).abs() < 1e-8);
    }
    assert!(report.residual_sum_squares < 1e-12);
    assert_eq!(report.domain, (0.0, 4.0));
}

#[test]
fn exactly_degree_plus_one_points_interpolate() {
    let xs = [0.1, 0.7, 1.3, 2.2, 3.0];
    let ys: Vec<f64> = xs.iter().map(|x| quartic(*x)).collect();
    let report = fit_polynomial(&xs, &ys, &FitOpts::default()).expect("fit");
    for (x, y) in xs.iter().zip(&ys) {
        assert!((report.evaluate(*x) - y).abs() < 1e-8);
    }
}

#[test]
fn lower_degree_fits_a_line() {
    let xs = [0.0, 1.0, 2.0, 3.0];
    let ys = [1.0, 3.0, 5.0, 7.0];
    let report = fit_polynomial(&xs, &ys, &FitOpts::with_degree(1)).expect("fit");
    let coefficients = report.model.coefficients();
    assert!((coefficients[0] - 2.0).abs() < 1e-10);
    assert!((coefficients[1] - 1.0).abs() < 1e-10);
    assert!((report.evaluate(10.0) - 21.0).abs() < 1e-8);
}

#[test]
fn fit_report_survives_json() {
    let xs: Vec<f64> = (0..7).map(|i| i as f64).collect();
    let ys: Vec<f64> = xs.iter().map(|x| quartic(*x)).collect();
    let report = fit_polynomial(&xs, &ys, &FitOpts::default()).expect("fit");
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("fit_report.json");
    write_fit_json(&path, &report).expect("write");
    let restored = read_fit_json(&path).expect("read");
    assert_eq!(restored.model.degree(), 4);
    assert_eq!(restored.point_count, 7);
    assert!((restored.evaluate(2.5) - report.evaluate(2.5)).abs() < 1e-9);
}
