use overlap_core::provenance::{RunProvenance, SchemaVersion};
use overlap_core::{from_json_slice, stable_hash_string, to_canonical_json_bytes, OverlapError};

#[test]
fn provenance_round_trip_json() {
    let provenance = RunProvenance::new("abc123", 99).with_tool("overlap-core", "0.1.0");

    let bytes = to_canonical_json_bytes(&provenance).expect("serialize");
    let decoded: RunProvenance = from_json_slice(&bytes).expect("deserialize");

    assert_eq!(decoded, provenance);
    assert_eq!(SchemaVersion::default(), SchemaVersion::new(1, 0, 0));
}

#[test]
fn errors_round_trip_with_family_tag() {
    let err = OverlapError::fit("ill_conditioned", "condition number too large");
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Fit\""));
    let decoded: OverlapError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}

#[test]
fn stable_hash_ignores_key_order() {
    let a = serde_json::json!({"bin_count": 10, "trials": 5});
    let b = serde_json::json!({"trials": 5, "bin_count": 10});
    assert_eq!(
        stable_hash_string(&a).expect("hash"),
        stable_hash_string(&b).expect("hash")
    );
}
