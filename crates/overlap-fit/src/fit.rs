use std::fs;
use std::path::Path;

use nalgebra::{DMatrix, DVector};
use overlap_core::errors::{ErrorInfo, OverlapError};
use overlap_core::{from_json_slice, to_canonical_json_bytes, SchemaVersion};
use overlap_mc::DensityPoint;
use serde::{Deserialize, Serialize};

use crate::polynomial::PolynomialModel;

fn default_degree() -> usize {
    4
}

fn default_max_condition() -> f64 {
    1e12
}

/// Options controlling the least-squares fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOpts {
    /// Degree of the fitted polynomial.
    #[serde(default = "default_degree")]
    pub degree: usize,
    /// Largest accepted condition number of the column-scaled design matrix.
    #[serde(default = "default_max_condition")]
    pub max_condition: f64,
}

impl Default for FitOpts {
    fn default() -> Self {
        Self {
            degree: default_degree(),
            max_condition: default_max_condition(),
        }
    }
}

impl FitOpts {
    /// Options for `degree` with the default conditioning limit.
    pub fn with_degree(degree: usize) -> Self {
        Self {
            degree,
            ..Self::default()
        }
    }
}

/// Fitted model together with its diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    /// Schema of this payload.
    pub schema_version: SchemaVersion,
    /// The fitted polynomial.
    pub model: PolynomialModel,
    /// Sum of squared residuals over the input points.
    pub residual_sum_squares: f64,
    /// Condition number of the column-scaled design matrix.
    pub condition_number: f64,
    /// Number of points the model was fitted to.
    pub point_count: usize,
    /// Smallest and largest x seen during the fit.
    pub domain: (f64, f64),
}

impl FitReport {
    /// Evaluates the fitted model at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.model.evaluate(x)
    }
}

/// Fits a least-squares polynomial of degree `opts.degree` to `(xs, ys)`.
///
/// The Vandermonde columns are scaled to unit norm before the SVD solve, and
/// the fit is refused when the scaled system's condition number exceeds
/// `opts.max_condition` or any singular value vanishes.
pub fn fit_polynomial(xs: &[f64], ys: &[f64], opts: &FitOpts) -> Result<FitReport, OverlapError> {
    if xs.len() != ys.len() {
        return Err(OverlapError::Fit(
            ErrorInfo::new("length_mismatch", "x and y series differ in length")
                .with_context("xs", xs.len())
                .with_context("ys", ys.len()),
        ));
    }
    let columns = match opts.degree.checked_add(1) {
        Some(columns) if xs.len() >= columns => columns,
        _ => {
            return Err(OverlapError::Fit(
                ErrorInfo::new("insufficient_points", "fewer points than coefficients")
                    .with_context("points", xs.len())
                    .with_context("degree", opts.degree)
                    .with_hint("lower the degree or sweep more entity counts"),
            ))
        }
    };
    if xs.iter().chain(ys).any(|value| !value.is_finite()) {
        return Err(OverlapError::fit(
            "non_finite_input",
            "points must have finite coordinates",
        ));
    }

    let rows = xs.len();
    let design = DMatrix::from_fn(rows, columns, |row, col| {
        xs[row].powi((opts.degree - col) as i32)
    });
    let scales: Vec<f64> = design.column_iter().map(|column| column.norm()).collect();
    let mut scaled = design.clone();
    for (col, scale) in scales.iter().enumerate() {
        if *scale > 0.0 {
            scaled.column_mut(col).unscale_mut(*scale);
        }
    }

    let svd = scaled.svd(true, true);
    let max_sv = svd.singular_values.max();
    let min_sv = svd.singular_values.min();
    let condition_number = if min_sv > 0.0 {
        max_sv / min_sv
    } else {
        f64::INFINITY
    };
    if condition_number.is_nan() || condition_number > opts.max_condition {
        return Err(OverlapError::Fit(
            ErrorInfo::new("ill_conditioned", "normal equations are near singular")
                .with_context("condition_number", condition_number)
                .with_context("max_condition", opts.max_condition)
                .with_hint("use more distinct densities or a lower degree"),
        ));
    }

    let targets = DVector::from_column_slice(ys);
    let solution = svd
        .solve(&targets, 0.0)
        .map_err(|err| OverlapError::fit("svd_solve", err))?;
    let coefficients: Vec<f64> = solution
        .iter()
        .zip(&scales)
        .map(|(value, scale)| if *scale > 0.0 { value / scale } else { *value })
        .collect();

    let fitted = &design * DVector::from_column_slice(&coefficients);
    let residual_sum_squares = (fitted - &targets).norm_squared();
    if !residual_sum_squares.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
        return Err(OverlapError::Fit(
            ErrorInfo::new("residual_blowup", "fit produced non-finite values")
                .with_context("residual_sum_squares", residual_sum_squares),
        ));
    }

    let domain = xs.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
        (lo.min(*x), hi.max(*x))
    });
    tracing::debug!(
        degree = opts.degree,
        points = rows,
        condition_number,
        residual_sum_squares,
        "polynomial fit"
    );

    Ok(FitReport {
        schema_version: SchemaVersion::default(),
        model: PolynomialModel::from_coefficients(coefficients)?,
        residual_sum_squares,
        condition_number,
        point_count: rows,
        domain,
    })
}

/// Fits the `(density, probability)` series of a sweep.
pub fn fit_points(points: &[DensityPoint], opts: &FitOpts) -> Result<FitReport, OverlapError> {
    let xs: Vec<f64> = points.iter().map(|point| point.density).collect();
    let ys: Vec<f64> = points.iter().map(|point| point.probability).collect();
    fit_polynomial(&xs, &ys, opts)
}

/// Writes the fit report as canonical JSON.
pub fn write_fit_json(path: &Path, report: &FitReport) -> Result<(), OverlapError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| OverlapError::serde("fit_dir", err))?;
    }
    let bytes = to_canonical_json_bytes(report)?;
    fs::write(path, bytes).map_err(|err| OverlapError::serde("fit_write", err))
}

/// Reads a fit report written by [`write_fit_json`].
pub fn read_fit_json(path: &Path) -> Result<FitReport, OverlapError> {
    let bytes = fs::read(path).map_err(|err| {
        OverlapError::Serde(
            ErrorInfo::new("fit_read", err.to_string()).with_context("path", path.display()),
        )
    })?;
    from_json_slice(&bytes)
}
