#![deny(missing_docs)]
#![doc = "Least-squares polynomial model of the overlap probability curve."]

/// Least-squares fitting and fit report persistence.
pub mod fit;
/// Polynomial representation and evaluation.
pub mod polynomial;

pub use fit::{fit_points, fit_polynomial, read_fit_json, write_fit_json, FitOpts, FitReport};
pub use polynomial::PolynomialModel;
