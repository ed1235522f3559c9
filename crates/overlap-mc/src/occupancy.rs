use std::collections::{BTreeMap, HashMap};

use overlap_core::errors::{ErrorInfo, OverlapError};
use serde::{Deserialize, Serialize};

use crate::sampler::Placement;

/// Number of bins reaching each occupancy level in one placement.
///
/// `levels[&2] == 3` means three bins each received exactly two entities.
/// Empty bins are not recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyHistogram {
    entities: u64,
    bin_count: u64,
    levels: BTreeMap<u64, u64>,
}

impl OccupancyHistogram {
    /// Counts entities per bin, then bins per occupancy level.
    pub fn from_placement(placement: &Placement) -> Self {
        let capacity = (placement.len() as u64).min(placement.bin_count()) as usize;
        let mut per_bin = HashMap::with_capacity(capacity);
        for bin in placement.bins() {
            *per_bin.entry(*bin).or_insert(0u64) += 1;
        }
        let mut levels = BTreeMap::new();
        for occupancy in per_bin.into_values() {
            *levels.entry(occupancy).or_insert(0u64) += 1;
        }
        Self {
            entities: placement.len() as u64,
            bin_count: placement.bin_count(),
            levels,
        }
    }

    /// Bins hit by exactly one entity.
    pub fn singly_occupied(&self) -> u64 {
        self.levels.get(&1).copied().unwrap_or(0)
    }

    /// Bins hit by two or more entities.
    pub fn multiply_occupied(&self) -> u64 {
        self.levels.range(2..).map(|(_, bins)| bins).sum()
    }

    /// Bins hit by at least one entity.
    pub fn occupied_bins(&self) -> u64 {
        self.levels.values().sum()
    }

    /// Number of bins at exactly `level`.
    pub fn bins_at(&self, level: u64) -> u64 {
        self.levels.get(&level).copied().unwrap_or(0)
    }

    /// Occupancy levels in increasing order.
    pub fn levels(&self) -> &BTreeMap<u64, u64> {
        &self.levels
    }

    /// Number of entities the histogram was built from.
    pub fn entities(&self) -> u64 {
        self.entities
    }

    /// Verifies `Σ level × bins == entities` and `Σ bins <= bin_count`.
    pub fn check_invariants(&self) -> Result<(), OverlapError> {
        let placed: u64 = self.levels.iter().map(|(level, bins)| level * bins).sum();
        if placed != self.entities {
            return Err(OverlapError::Invariant(
                ErrorInfo::new("histogram_sum", "occupancy levels do not add up to entities")
                    .with_context("entities", self.entities)
                    .with_context("placed", placed),
            ));
        }
        let occupied = self.occupied_bins();
        if occupied > self.bin_count {
            return Err(OverlapError::Invariant(
                ErrorInfo::new("histogram_bins", "more bins occupied than exist")
                    .with_context("bin_count", self.bin_count)
                    .with_context("occupied", occupied),
            ));
        }
        Ok(())
    }
}
