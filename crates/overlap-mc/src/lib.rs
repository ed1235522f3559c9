#![deny(missing_docs)]

//! Monte Carlo estimate of the probability that, with `k` entities placed
//! uniformly at random into `N` bins, at least one bin receives more than one
//! entity.
//!
//! The pipeline runs leaves first: [`sample_placement`] draws a placement,
//! [`OccupancyHistogram`] reduces it, [`aggregate_trials`] sums the
//! singly-occupied bins over many trials and [`run_sweep`] turns those sums
//! into a `(density, probability)` series for a range of entity counts.

/// Cooperative cancellation between sweep steps.
pub mod cancel;
/// YAML configuration schema and validation.
pub mod config;
/// Deterministic seed derivation for steps and trials.
pub mod determinism;
/// CSV and JSON export of sweep results.
pub mod export;
/// Occupancy histogram of a single placement.
pub mod occupancy;
/// Uniform placement of entities into bins.
pub mod sampler;
/// Probability sweep over entity counts.
pub mod sweep;
/// Trial aggregation for a single entity count.
pub mod trials;

pub use cancel::CancelToken;
pub use config::{load_config, SeedPolicy, SweepConfig, MAX_SWEEP_STEPS};
pub use export::{read_points_csv, read_report_json, write_points_csv, write_report_json};
pub use occupancy::OccupancyHistogram;
pub use sampler::{sample_placement, BinId, Placement};
pub use sweep::{
    overlap_probability, run_sweep, run_sweep_observed, run_sweep_with_cancel, sweep_point,
    DensityPoint, SweepReport, SweepStatus,
};
pub use trials::{aggregate_trials, aggregate_trials_par, run_trial, TrialTally};
