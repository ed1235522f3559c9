use overlap_core::errors::{ErrorInfo, OverlapError};
use overlap_core::{stable_hash_string, RunProvenance, SchemaVersion};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::config::SweepConfig;
use crate::determinism::step_seed;
use crate::trials::{aggregate_trials, aggregate_trials_par, TrialTally};

/// One step of the probability curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    /// Entities placed per trial.
    pub entities: u64,
    /// Entities per bin, the curve's x coordinate.
    pub density: f64,
    /// Estimated probability that some bin holds more than one entity.
    pub probability: f64,
    /// Raw singly-occupied total the probability was derived from.
    pub singly_occupied_total: u64,
}

/// Whether a sweep visited every entity count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepStatus {
    /// All configured steps were run.
    Completed,
    /// Cancellation was requested; `points` holds the steps that finished.
    Cancelled,
}

/// Result of a probability sweep, ordered by entity count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Schema of this payload.
    pub schema_version: SchemaVersion,
    /// Configuration hash, seed and crate versions.
    pub provenance: RunProvenance,
    /// Configuration the sweep ran with.
    pub config: SweepConfig,
    /// Completion state.
    pub status: SweepStatus,
    /// Points in strictly increasing entity-count order.
    pub points: Vec<DensityPoint>,
}

impl SweepReport {
    /// `(density, probability)` pairs in sweep order.
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|point| (point.density, point.probability))
            .collect()
    }
}

/// Converts a tally into the probability of at least one shared bin.
///
/// The singly-occupied total is normalised per placed entity,
/// `1 - total / (entities * trials)`. A result outside `[0, 1]` is an
/// accounting defect and is reported, never clamped.
pub fn overlap_probability(tally: &TrialTally) -> Result<f64, OverlapError> {
    let samples = tally.samples();
    if samples == 0 {
        return Err(OverlapError::Config(
            ErrorInfo::new("entities", "probability needs at least one placed entity")
                .with_context("entities", tally.entities)
                .with_context("trials", tally.trials),
        ));
    }
    let probability = 1.0 - tally.singly_occupied_total as f64 / samples as f64;
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(OverlapError::Invariant(
            ErrorInfo::new("probability_range", "probability outside [0, 1]")
                .with_context("probability", probability)
                .with_context("entities", tally.entities)
                .with_context("singly_occupied_total", tally.singly_occupied_total),
        ));
    }
    Ok(probability)
}

fn point_from_tally(tally: &TrialTally) -> Result<DensityPoint, OverlapError> {
    let probability = overlap_probability(tally)?;
    let point = DensityPoint {
        entities: tally.entities,
        density: tally.entities as f64 / tally.bin_count as f64,
        probability,
        singly_occupied_total: tally.singly_occupied_total,
    };
    tracing::debug!(
        entities = point.entities,
        density = point.density,
        probability = point.probability,
        "sweep step"
    );
    Ok(point)
}

/// Estimates the point for a single entity count on the calling thread.
pub fn sweep_point(config: &SweepConfig, entities: u64) -> Result<DensityPoint, OverlapError> {
    let seed = step_seed(config.seed_policy.master_seed, entities);
    let tally = aggregate_trials(entities, config.bin_count, config.trials_per_step, seed)?;
    point_from_tally(&tally)
}

fn sweep_point_par(config: &SweepConfig, entities: u64) -> Result<DensityPoint, OverlapError> {
    let seed = step_seed(config.seed_policy.master_seed, entities);
    let tally = aggregate_trials_par(entities, config.bin_count, config.trials_per_step, seed)?;
    point_from_tally(&tally)
}

/// Runs the full sweep described by `config`.
pub fn run_sweep(config: &SweepConfig) -> Result<SweepReport, OverlapError> {
    run_sweep_with_cancel(config, &CancelToken::new())
}

/// Runs the sweep, checking `cancel` before each entity count.
///
/// With `parallelism > 1` steps and their trials are spread over a dedicated
/// rayon pool; points are re-ordered by entity count before returning, and
/// the series is identical to the single-threaded one for the same seed.
pub fn run_sweep_with_cancel(
    config: &SweepConfig,
    cancel: &CancelToken,
) -> Result<SweepReport, OverlapError> {
    run_sweep_observed(config, cancel, &|_: &DensityPoint| {})
}

/// Runs the sweep and hands every finished point to `observer`.
///
/// The observer runs on the thread that finished the step, so under
/// parallel execution it sees points out of entity order. After a
/// cancellation the report keeps only the points that form a gap-free prefix
/// of the entity counts, so the observer may have seen points the report
/// drops.
pub fn run_sweep_observed(
    config: &SweepConfig,
    cancel: &CancelToken,
    observer: &(dyn Fn(&DensityPoint) + Sync),
) -> Result<SweepReport, OverlapError> {
    config.validate()?;
    let config_hash = stable_hash_string(config)?;
    let counts: Vec<u64> = config.entity_counts().collect();

    let (points, status) = if config.parallelism > 1 {
        run_parallel(config, &counts, cancel, observer)?
    } else {
        run_serial(config, &counts, cancel, observer)?
    };

    if status == SweepStatus::Cancelled {
        tracing::warn!(
            completed = points.len(),
            planned = counts.len(),
            "sweep cancelled"
        );
    } else {
        tracing::info!(
            steps = points.len(),
            bin_count = config.bin_count,
            trials = config.trials_per_step,
            "sweep complete"
        );
    }

    Ok(SweepReport {
        schema_version: SchemaVersion::default(),
        provenance: RunProvenance::new(config_hash, config.seed_policy.master_seed)
            .with_tool("overlap-mc", env!("CARGO_PKG_VERSION")),
        config: config.clone(),
        status,
        points,
    })
}

fn run_serial(
    config: &SweepConfig,
    counts: &[u64],
    cancel: &CancelToken,
    observer: &(dyn Fn(&DensityPoint) + Sync),
) -> Result<(Vec<DensityPoint>, SweepStatus), OverlapError> {
    let mut points = Vec::with_capacity(counts.len());
    for &entities in counts {
        if cancel.is_cancelled() {
            return Ok((points, SweepStatus::Cancelled));
        }
        let point = sweep_point(config, entities)?;
        observer(&point);
        points.push(point);
    }
    Ok((points, SweepStatus::Completed))
}

fn run_parallel(
    config: &SweepConfig,
    counts: &[u64],
    cancel: &CancelToken,
    observer: &(dyn Fn(&DensityPoint) + Sync),
) -> Result<(Vec<DensityPoint>, SweepStatus), OverlapError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.parallelism)
        .build()
        .map_err(|err| OverlapError::config("thread_pool", err.to_string()))?;

    let results: Result<Vec<_>, OverlapError> = pool.install(|| {
        counts
            .par_iter()
            .enumerate()
            .map(
                |(index, &entities)| -> Result<Option<(usize, DensityPoint)>, OverlapError> {
                    if cancel.is_cancelled() {
                        return Ok(None);
                    }
                    let point = sweep_point_par(config, entities)?;
                    observer(&point);
                    Ok(Some((index, point)))
                },
            )
            .collect()
    });

    let mut ordered: Vec<_> = results?.into_iter().flatten().collect();
    ordered.sort_by_key(|(index, _)| *index);
    // Workers finish out of order; only the gap-free run from the first step
    // is kept, so a cancelled report is a prefix of the completed one.
    let points: Vec<DensityPoint> = ordered
        .into_iter()
        .enumerate()
        .take_while(|(position, (index, _))| position == index)
        .map(|(_, (_, point))| point)
        .collect();
    let status = if points.len() == counts.len() {
        SweepStatus::Completed
    } else {
        SweepStatus::Cancelled
    };
    Ok((points, status))
}
