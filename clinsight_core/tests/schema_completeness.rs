//! The record always carries the full schema with string leaves.

use chrono::{DateTime, TimeZone, Utc};
use clinsight_core::{ClinicalRecord, InsightAssembler, NOT_FOUND};
use serde_json::Value;

const JANE_SMITH: &str = include_str!("../../demos/jane_smith.txt");

fn processed_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0)
        .single()
        .unwrap_or_default()
}

#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
fn to_json(text: &str) -> Value {
    let record = InsightAssembler::standard().assemble_at(text, processed_at());
    serde_json::to_value(&record).expect("record should serialize")
}

/// Dotted paths of every leaf, paired with whether the leaf is a string.
fn leaves(value: &Value, prefix: &str, out: &mut Vec<(String, bool)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                leaves(child, &path, out);
            }
        }
        other => out.push((prefix.to_string(), other.is_string())),
    }
}

fn leaf_paths(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    leaves(&to_json(text), "", &mut out);
    for (path, is_string) in &out {
        assert!(is_string, "leaf {path} is not a string");
    }
    let mut paths: Vec<String> = out.into_iter().map(|(path, _)| path).collect();
    paths.sort();
    paths
}

#[test]
fn test_top_level_sections() {
    let json = to_json("");
    let Value::Object(map) = json else {
        panic!("record should serialize to an object");
    };
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "intra_operative",
            "metadata",
            "patient_info",
            "post_operative",
            "pre_operative",
            "risk_assessment",
            "surgical_plan",
        ]
    );
}

#[test]
fn test_leaf_set_is_input_independent() {
    let empty = leaf_paths("");
    let adversarial = leaf_paths("!!! ??? <<>> \u{0} \u{1F600} ASA ASA ASA -- :: ; ; \n\n\t");
    let sample = leaf_paths(JANE_SMITH);
    assert_eq!(empty, adversarial);
    assert_eq!(empty, sample);
    assert_eq!(empty.len(), 52);
}

#[test]
fn test_empty_text_is_all_sentinels() {
    let json = to_json("");
    let mut out = Vec::new();
    leaves(&json, "", &mut out);
    for (path, _) in out {
        if path.starts_with("metadata.") || path.starts_with("risk_assessment.") {
            continue;
        }
        let pointer = format!("/{}", path.replace('.', "/"));
        assert_eq!(json.pointer(&pointer), Some(&Value::from(NOT_FOUND)), "{path}");
    }
}

#[test]
fn test_metadata() {
    let json = to_json(JANE_SMITH);
    assert_eq!(json["metadata"]["version"], "1.0");
    assert_eq!(
        json["metadata"]["extraction_confidence"],
        "Automated extraction - verify critical values"
    );
    assert_eq!(
        json["metadata"]["processed_timestamp"],
        "2025-06-01T08:30:00.000000Z"
    );
}

#[test]
fn test_extraction_is_idempotent() {
    assert_eq!(to_json(JANE_SMITH), to_json(JANE_SMITH));
}

#[test]
#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
fn test_record_round_trips_through_json() {
    let record = InsightAssembler::standard().assemble_at(JANE_SMITH, processed_at());
    let json = serde_json::to_string(&record).expect("record should serialize");
    let parsed: ClinicalRecord = serde_json::from_str(&json).expect("record should parse");
    assert_eq!(parsed, record);
}
