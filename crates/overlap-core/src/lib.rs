#![deny(missing_docs)]
#![doc = "Shared error, seeding and serialization primitives for the overlap estimator."]

pub mod errors;
pub mod hash;
pub mod provenance;
pub mod rng;
pub mod serde;

pub use crate::serde::{from_json_slice, from_yaml_slice, to_canonical_json_bytes};
pub use errors::{ErrorInfo, OverlapError};
pub use hash::stable_hash_string;
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
