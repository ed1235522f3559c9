use overlap_core::errors::{ErrorInfo, OverlapError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Identifier of one equivalent volume, in `1..=bin_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BinId(u64);

impl BinId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Bins drawn for every entity of one trial, in draw order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    bin_count: u64,
    bins: Vec<BinId>,
}

impl Placement {
    /// Number of bins the placement was drawn from.
    pub fn bin_count(&self) -> u64 {
        self.bin_count
    }

    /// Number of entities placed.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// True when no entity was placed.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Bins in draw order; repeats mean shared occupancy.
    pub fn bins(&self) -> &[BinId] {
        &self.bins
    }
}

/// Places `entities` entities independently and uniformly into bins
/// `1..=bin_count`, with replacement.
pub fn sample_placement<R: Rng + ?Sized>(
    entities: u64,
    bin_count: u64,
    rng: &mut R,
) -> Result<Placement, OverlapError> {
    if bin_count < 1 {
        return Err(OverlapError::Config(
            ErrorInfo::new("bin_count", "at least one bin is required")
                .with_context("bin_count", bin_count),
        ));
    }
    let len = usize::try_from(entities).map_err(|_| {
        OverlapError::Config(
            ErrorInfo::new("entities", "entity count exceeds addressable memory")
                .with_context("entities", entities),
        )
    })?;
    let bins = (0..len)
        .map(|_| BinId(rng.gen_range(1..=bin_count)))
        .collect();
    Ok(Placement { bin_count, bins })
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlap_core::RngHandle;

    #[test]
    fn draws_stay_in_range() {
        let mut rng = RngHandle::from_seed(3);
        let placement = sample_placement(500, 7, &mut rng).expect("placement");
        assert_eq!(placement.len(), 500);
        assert!(placement
            .bins()
            .iter()
            .all(|bin| (1..=7).contains(&bin.as_raw())));
    }

    #[test]
    fn every_bin_is_reachable() {
        let mut rng = RngHandle::from_seed(11);
        let placement = sample_placement(400, 4, &mut rng).expect("placement");
        for raw in 1..=4 {
            assert!(placement.bins().contains(&BinId::from_raw(raw)));
        }
    }

    #[test]
    fn zero_bins_is_rejected() {
        let mut rng = RngHandle::from_seed(1);
        let err = sample_placement(3, 0, &mut rng).expect_err("no bins");
        assert!(matches!(err, OverlapError::Config(_)));
    }

    #[test]
    fn zero_entities_yields_empty_placement() {
        let mut rng = RngHandle::from_seed(1);
        let placement = sample_placement(0, 5, &mut rng).expect("placement");
        assert!(placement.is_empty());
    }
}
