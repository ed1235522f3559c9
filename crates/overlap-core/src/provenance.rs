//! Provenance and schema descriptors attached to persisted reports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance information attached to every sweep and fit report.
///
/// Reports carry no timestamps so that two runs with the same seed and
/// configuration serialize to identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Stable hash of the configuration that produced the data.
    pub config_hash: String,
    /// Master deterministic seed used for all randomness.
    pub seed: u64,
    /// Version map for the crates involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}

impl RunProvenance {
    /// Creates a provenance record for `config_hash` and `seed`.
    pub fn new(config_hash: impl Into<String>, seed: u64) -> Self {
        Self {
            config_hash: config_hash.into(),
            seed,
            tool_versions: BTreeMap::new(),
        }
    }

    /// Records the version of a crate that touched the data.
    pub fn with_tool(mut self, name: &str, version: &str) -> Self {
        self.tool_versions.insert(name.to_string(), version.to_string());
        self
    }
}
