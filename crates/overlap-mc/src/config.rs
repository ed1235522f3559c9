use std::fs;
use std::path::Path;

use overlap_core::errors::{ErrorInfo, OverlapError};
use overlap_core::from_yaml_slice;
use serde::{Deserialize, Serialize};

/// YAML-configurable parameters governing a probability sweep.
///
/// Every count is unsigned, so negative values are rejected at parse time;
/// [`SweepConfig::validate`] rejects the zero values that would make a sweep
/// meaningless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Number of discrete bins (equivalent volumes) entities are placed into.
    #[serde(default = "default_bin_count")]
    pub bin_count: u64,
    /// Largest entity count included in the sweep.
    #[serde(default = "default_max_entities")]
    pub max_entities: u64,
    /// Monte Carlo repetitions per entity count.
    #[serde(default = "default_trials_per_step")]
    pub trials_per_step: u64,
    /// Increment between successive entity counts.
    #[serde(default = "default_step_size")]
    pub step_size: u64,
    /// First entity count in the sweep.
    #[serde(default = "default_start_entities")]
    pub start_entities: u64,
    /// Degree of the polynomial fitted to the resulting curve.
    #[serde(default = "default_polynomial_degree")]
    pub polynomial_degree: usize,
    /// Master seed and labelling.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Number of worker threads used for the sweep (1 runs inline).
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

fn default_bin_count() -> u64 {
    1000
}

fn default_max_entities() -> u64 {
    5000
}

fn default_trials_per_step() -> u64 {
    1000
}

fn default_step_size() -> u64 {
    100
}

fn default_start_entities() -> u64 {
    2
}

fn default_polynomial_degree() -> usize {
    4
}

fn default_parallelism() -> usize {
    1
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            bin_count: default_bin_count(),
            max_entities: default_max_entities(),
            trials_per_step: default_trials_per_step(),
            step_size: default_step_size(),
            start_entities: default_start_entities(),
            polynomial_degree: default_polynomial_degree(),
            seed_policy: SeedPolicy::default(),
            parallelism: default_parallelism(),
        }
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed used for the run.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded alongside the seed in reports.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

fn positive(field: &str, value: u64) -> Result<(), OverlapError> {
    if value == 0 {
        return Err(OverlapError::Config(
            ErrorInfo::new(field, format!("{field} must be positive"))
                .with_context(field, value),
        ));
    }
    Ok(())
}

/// Largest number of entity counts a single sweep may visit.
pub const MAX_SWEEP_STEPS: u64 = 1_000_000;

impl SweepConfig {
    /// Checks every field before any sampling begins.
    pub fn validate(&self) -> Result<(), OverlapError> {
        positive("bin_count", self.bin_count)?;
        positive("trials_per_step", self.trials_per_step)?;
        positive("step_size", self.step_size)?;
        positive("start_entities", self.start_entities)?;
        if self.parallelism == 0 {
            return Err(OverlapError::Config(
                ErrorInfo::new("parallelism", "parallelism must be at least one")
                    .with_hint("use 1 to run the sweep on the calling thread"),
            ));
        }
        // Keeps k * trials_per_step representable for every swept k.
        if self.max_entities.checked_mul(self.trials_per_step).is_none() {
            return Err(OverlapError::Config(
                ErrorInfo::new("sample_overflow", "max_entities * trials_per_step overflows")
                    .with_context("max_entities", self.max_entities)
                    .with_context("trials_per_step", self.trials_per_step),
            ));
        }
        let steps = self.planned_steps();
        if steps > MAX_SWEEP_STEPS {
            return Err(OverlapError::Config(
                ErrorInfo::new("step_count", "sweep visits too many entity counts")
                    .with_context("planned_steps", steps)
                    .with_context("max_steps", MAX_SWEEP_STEPS)
                    .with_hint("raise step_size or lower max_entities"),
            ));
        }
        Ok(())
    }

    /// Checks that the planned series can carry a polynomial of
    /// `polynomial_degree`, which needs `degree + 1` points.
    ///
    /// Separate from [`SweepConfig::validate`] because a sweep on its own
    /// never fits and may legitimately produce fewer points.
    pub fn validate_fit_plan(&self) -> Result<(), OverlapError> {
        let steps = self.planned_steps();
        let enough = self
            .polynomial_degree
            .checked_add(1)
            .map_or(false, |needed| steps >= needed as u64);
        if !enough {
            return Err(OverlapError::Config(
                ErrorInfo::new("polynomial_degree", "sweep plans fewer points than coefficients")
                    .with_context("polynomial_degree", self.polynomial_degree)
                    .with_context("planned_steps", steps)
                    .with_hint("lower polynomial_degree or sweep more entity counts"),
            ));
        }
        Ok(())
    }

    /// Number of entity counts the sweep will visit.
    pub fn planned_steps(&self) -> u64 {
        if self.step_size == 0 || self.start_entities > self.max_entities {
            return 0;
        }
        (self.max_entities - self.start_entities) / self.step_size + 1
    }

    /// Entity counts visited by the sweep, in increasing order.
    ///
    /// Empty when `start_entities > max_entities`.
    pub fn entity_counts(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.planned_steps()).map(move |step| self.start_entities + step * self.step_size)
    }
}

/// Loads and validates a sweep configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<SweepConfig, OverlapError> {
    let bytes = fs::read(path).map_err(|err| {
        OverlapError::Serde(
            ErrorInfo::new("config_read", err.to_string())
                .with_context("path", path.display()),
        )
    })?;
    let config: SweepConfig = from_yaml_slice(&bytes)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_reference_run() {
        let config = SweepConfig::default();
        assert_eq!(config.bin_count, 1000);
        assert_eq!(config.start_entities, 2);
        assert_eq!(config.polynomial_degree, 4);
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn entity_counts_stop_at_max() {
        let config = SweepConfig {
            start_entities: 2,
            max_entities: 25,
            step_size: 10,
            ..SweepConfig::default()
        };
        assert_eq!(config.planned_steps(), 3);
        assert_eq!(config.entity_counts().collect::<Vec<_>>(), vec![2, 12, 22]);
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let config: SweepConfig =
            from_yaml_slice(b"bin_count: 10\ntrials_per_step: 5\n").expect("parse");
        assert_eq!(config.bin_count, 10);
        assert_eq!(config.trials_per_step, 5);
        assert_eq!(config.step_size, 100);
    }

    #[test]
    fn unbounded_step_count_is_rejected() {
        let config = SweepConfig {
            start_entities: 1,
            step_size: 1,
            max_entities: 1_000_000_000_000,
            trials_per_step: 1,
            ..SweepConfig::default()
        };
        let err = config.validate().expect_err("too many steps");
        assert!(matches!(err, OverlapError::Config(_)));
        assert_eq!(err.info().code, "step_count");

        let at_cap = SweepConfig {
            max_entities: MAX_SWEEP_STEPS,
            ..config
        };
        assert_eq!(at_cap.planned_steps(), MAX_SWEEP_STEPS);
        at_cap.validate().expect("cap itself is allowed");
    }

    #[test]
    fn fit_plan_needs_degree_plus_one_steps() {
        let short = SweepConfig {
            bin_count: 10,
            max_entities: 12,
            step_size: 5,
            ..SweepConfig::default()
        };
        assert_eq!(short.planned_steps(), 3);
        short.validate().expect("sweep alone is fine");
        let err = short.validate_fit_plan().expect_err("degree four needs five points");
        assert_eq!(err.info().code, "polynomial_degree");

        let quadratic = SweepConfig {
            polynomial_degree: 2,
            ..short.clone()
        };
        quadratic.validate_fit_plan().expect("three points carry a quadratic");

        let huge = SweepConfig {
            polynomial_degree: usize::MAX,
            ..short
        };
        let err = huge.validate_fit_plan().expect_err("degree overflows");
        assert_eq!(err.info().code, "polynomial_degree");
    }
}
