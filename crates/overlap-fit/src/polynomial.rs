use std::fmt;

use overlap_core::errors::OverlapError;
use serde::{Deserialize, Serialize};

/// Polynomial with coefficients stored highest degree first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialModel {
    degree: usize,
    coefficients: Vec<f64>,
}

impl PolynomialModel {
    /// Builds a model from coefficients ordered highest degree first.
    pub fn from_coefficients(coefficients: Vec<f64>) -> Result<Self, OverlapError> {
        if coefficients.is_empty() {
            return Err(OverlapError::fit(
                "empty_polynomial",
                "a polynomial needs at least one coefficient",
            ));
        }
        Ok(Self {
            degree: coefficients.len() - 1,
            coefficients,
        })
    }

    /// Fitted degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Coefficients, highest degree first.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluates the polynomial at `x` with Horner's scheme.
    ///
    /// No range check is made; values outside the fitted domain are
    /// extrapolations.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .fold(0.0, |acc, coefficient| acc * x + coefficient)
    }
}

impl fmt::Display for PolynomialModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, coefficient) in self.coefficients.iter().enumerate() {
            let power = self.degree - idx;
            let magnitude = coefficient.abs();
            if idx == 0 {
                if coefficient.is_sign_negative() {
                    write!(f, "-")?;
                }
            } else if coefficient.is_sign_negative() {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            match power {
                0 => write!(f, "{magnitude:.6}")?,
                1 => write!(f, "{magnitude:.6} x")?,
                _ => write!(f, "{magnitude:.6} x^{power}")?,
            }
        }
        Ok(())
    }
}
