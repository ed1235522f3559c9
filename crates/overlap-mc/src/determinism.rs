use overlap_core::derive_substream_seed;

/// Derives the seed shared by all trials of the step with `entities` entities.
///
/// Keyed by entity count rather than step index so that a point keeps its
/// value when the sweep range is widened or re-stepped.
pub fn step_seed(master_seed: u64, entities: u64) -> u64 {
    derive_substream_seed(master_seed, entities)
}

/// Derives the seed for one trial within a step.
pub fn trial_seed(step_seed: u64, trial: u64) -> u64 {
    derive_substream_seed(step_seed ^ 0xA5A5_A5A5_A5A5_A5A5, trial)
}
