use overlap_core::errors::{ErrorInfo, OverlapError};
use overlap_core::RngHandle;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::determinism::trial_seed;
use crate::occupancy::OccupancyHistogram;
use crate::sampler::sample_placement;

/// Singly-occupied bins accumulated over every trial of one entity count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialTally {
    /// Entities placed per trial.
    pub entities: u64,
    /// Bins available per trial.
    pub bin_count: u64,
    /// Number of independent trials run.
    pub trials: u64,
    /// Sum of singly-occupied bins across all trials.
    pub singly_occupied_total: u64,
}

impl TrialTally {
    /// Entity placements observed, `entities * trials`.
    pub fn samples(&self) -> u64 {
        self.entities * self.trials
    }
}

fn check_trial_args(entities: u64, bin_count: u64, trials: u64) -> Result<(), OverlapError> {
    if trials < 1 {
        return Err(OverlapError::Config(
            ErrorInfo::new("trials_per_step", "at least one trial is required")
                .with_context("trials", trials),
        ));
    }
    if bin_count < 1 {
        return Err(OverlapError::Config(
            ErrorInfo::new("bin_count", "at least one bin is required")
                .with_context("bin_count", bin_count),
        ));
    }
    if entities.checked_mul(trials).is_none() {
        return Err(OverlapError::Config(
            ErrorInfo::new("sample_overflow", "entities * trials overflows")
                .with_context("entities", entities)
                .with_context("trials", trials),
        ));
    }
    Ok(())
}

/// Runs one trial on its own generator and returns the singly-occupied count.
pub fn run_trial(entities: u64, bin_count: u64, seed: u64) -> Result<u64, OverlapError> {
    let mut rng = RngHandle::from_seed(seed);
    let placement = sample_placement(entities, bin_count, &mut rng)?;
    let histogram = OccupancyHistogram::from_placement(&placement);
    histogram.check_invariants()?;
    Ok(histogram.singly_occupied())
}

/// Runs `trials` independent trials on the calling thread.
///
/// Trial `t` draws from `trial_seed(step_seed, t)`, so the total equals the
/// one produced by [`aggregate_trials_par`] for the same arguments.
pub fn aggregate_trials(
    entities: u64,
    bin_count: u64,
    trials: u64,
    step_seed: u64,
) -> Result<TrialTally, OverlapError> {
    check_trial_args(entities, bin_count, trials)?;
    let mut total = 0u64;
    for trial in 0..trials {
        total += run_trial(entities, bin_count, trial_seed(step_seed, trial))?;
    }
    Ok(TrialTally {
        entities,
        bin_count,
        trials,
        singly_occupied_total: total,
    })
}

/// Distributes the trials of one entity count over the current rayon pool.
pub fn aggregate_trials_par(
    entities: u64,
    bin_count: u64,
    trials: u64,
    step_seed: u64,
) -> Result<TrialTally, OverlapError> {
    check_trial_args(entities, bin_count, trials)?;
    let total = (0..trials)
        .into_par_iter()
        .map(|trial| run_trial(entities, bin_count, trial_seed(step_seed, trial)))
        .try_reduce(|| 0, |a, b| Ok(a + b))?;
    Ok(TrialTally {
        entities,
        bin_count,
        trials,
        singly_occupied_total: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_bin_never_singly_occupied() {
        let tally = aggregate_trials(3, 1, 20, 9).expect("tally");
        assert_eq!(tally.singly_occupied_total, 0);
        assert_eq!(tally.samples(), 60);
    }

    #[test]
    fn one_entity_is_always_alone() {
        let tally = aggregate_trials(1, 50, 40, 9).expect("tally");
        assert_eq!(tally.singly_occupied_total, 40);
    }

    #[test]
    fn zero_trials_is_rejected() {
        let err = aggregate_trials(3, 10, 0, 9).expect_err("no trials");
        assert_eq!(err.info().code, "trials_per_step");
    }

    #[test]
    fn parallel_total_matches_serial() {
        let serial = aggregate_trials(40, 30, 200, 77).expect("serial");
        let parallel = aggregate_trials_par(40, 30, 200, 77).expect("parallel");
        assert_eq!(serial, parallel);
    }
}
