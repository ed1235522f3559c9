use overlap_core::OverlapError;
use overlap_fit::{fit_points, fit_polynomial, FitOpts};
use overlap_mc::DensityPoint;

#[test]
fn too_few_points_is_a_fit_error() {
    let points: Vec<DensityPoint> = (1..=4)
        .map(|k| DensityPoint {
            entities: k,
            density: k as f64 / 10.0,
            probability: 0.1 * k as f64,
            singly_occupied_total: 0,
        })
        .collect();
    let err = fit_points(&points, &FitOpts::default()).expect_err("four points, degree four");
    assert!(matches!(err, OverlapError::Fit(_)));
    assert_eq!(err.info().code, "insufficient_points");

    fit_points(&points, &FitOpts::with_degree(3)).expect("degree three fits");
}

#[test]
fn repeated_density_is_ill_conditioned() {
    let xs = [0.5; 6];
    let ys = [0.1, 0.2, 0.1, 0.2, 0.1, 0.2];
    let err = fit_polynomial(&xs, &ys, &FitOpts::default()).expect_err("singular");
    assert_eq!(err.info().code, "ill_conditioned");
}

#[test]
fn non_finite_points_are_rejected() {
    let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
    let ys = [0.0, f64::NAN, 0.2, 0.3, 0.4];
    let err = fit_polynomial(&xs, &ys, &FitOpts::default()).expect_err("nan");
    assert_eq!(err.info().code, "non_finite_input");
}

#[test]
fn mismatched_lengths_are_rejected() {
    let err = fit_polynomial(&[0.0, 1.0], &[0.0], &FitOpts::with_degree(0)).expect_err("len");
    assert_eq!(err.info().code, "length_mismatch");
}

#[test]
fn unbounded_degree_is_a_fit_error() {
    let xs = [0.0, 1.0, 2.0];
    let err = fit_polynomial(&xs, &xs, &FitOpts::with_degree(usize::MAX)).expect_err("degree");
    assert!(matches!(err, OverlapError::Fit(_)));
    assert_eq!(err.info().code, "insufficient_points");
}
