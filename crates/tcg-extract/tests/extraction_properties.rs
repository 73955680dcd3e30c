//! Universal properties of extraction and normalization.
//!
//! - Extraction never returns an empty sequence, whatever the input.
//! - Normalized records always carry a non-empty id and summary.
//! - Steps are always a single string, whether the input used arrays or strings.

use proptest::prelude::*;
use serde_json::json;
use tcg_core::{CandidateRecord, ExtractionSource, RecordKind};
use tcg_extract::{extract_records, fallback_len, normalize};

fn any_kind() -> impl Strategy<Value = RecordKind> {
    prop_oneof![Just(RecordKind::TestCase), Just(RecordKind::Scenario)]
}

fn step_value() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        "[a-zA-Z ]{0,30}".prop_map(serde_json::Value::from),
        proptest::collection::vec("[a-zA-Z ]{0,15}", 0..5).prop_map(|v| json!(v)),
        Just(serde_json::Value::Null),
        Just(json!({"action": "click"})),
    ]
}

proptest! {
    #[test]
    fn prop_extraction_never_empty(raw in ".{0,300}", kind in any_kind()) {
        let extraction = extract_records(&raw, kind);
        prop_assert!(!extraction.records.is_empty());
    }

    #[test]
    fn prop_truncated_json_never_empty(cut in 0usize..120, kind in any_kind()) {
        let full = r#"[{"id": "TC_1", "summary": "Create user", "steps": ["Open", "Save"]}, {"id": "TC_2", "summary": "Delete user"}]"#;
        let raw = &full[..cut.min(full.len())];
        let extraction = extract_records(raw, kind);
        prop_assert!(!extraction.records.is_empty());
    }

    #[test]
    fn prop_normalized_invariants(
        ids in proptest::collection::vec(proptest::option::of("[A-Z]{0,3}_?[0-9]{0,2}"), 1..8),
        summaries in proptest::collection::vec(proptest::option::of("[a-z ]{0,20}"), 1..8),
        steps in proptest::collection::vec(step_value(), 1..8),
        kind in any_kind(),
    ) {
        let candidates: Vec<CandidateRecord> = ids
            .iter()
            .zip(summaries.iter())
            .zip(steps.iter())
            .map(|((id, summary), steps)| {
                let mut value = json!({ "steps": steps });
                if let Some(id) = id {
                    value["id"] = json!(id);
                }
                if let Some(summary) = summary {
                    value["summary"] = json!(summary);
                }
                CandidateRecord::from_json(&value).unwrap()
            })
            .collect();

        let records = normalize(&candidates, kind);
        prop_assert_eq!(records.len(), candidates.len());
        for record in &records {
            prop_assert!(!record.id.is_empty());
            prop_assert!(!record.summary.is_empty());
            prop_assert!(!record.steps.starts_with('['));
        }
    }
}

#[test]
fn unparseable_text_yields_known_fallback_length() {
    let extraction = extract_records("I cannot help with that request.", RecordKind::TestCase);
    assert_eq!(extraction.source, ExtractionSource::Fallback);
    assert_eq!(extraction.records.len(), fallback_len(RecordKind::TestCase));

    let records = normalize(&extraction.records, RecordKind::TestCase);
    assert_eq!(records.len(), fallback_len(RecordKind::TestCase));
    assert_eq!(records[0].id, "TC_1");
}

#[test]
fn empty_input_yields_fallback() {
    for kind in [RecordKind::TestCase, RecordKind::Scenario] {
        let extraction = extract_records("", kind);
        assert!(extraction.is_synthetic());
        assert_eq!(extraction.records.len(), fallback_len(kind));
    }
}

#[test]
fn trailing_comma_scenario_recovers_both_records() {
    let raw = r#"Here you go:
[
  {"id": "TC_1", "summary": "Login with valid credentials", "steps": ["Open", "Submit"]},
  {"id": "TC_2", "summary": "Login with wrong password", "steps": "1. Open\n2. Submit"},
]"#;
    let extraction = extract_records(raw, RecordKind::TestCase);
    assert_eq!(extraction.source, ExtractionSource::Repaired);

    let records = normalize(&extraction.records, RecordKind::TestCase);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].steps, "Open\nSubmit");
    assert_eq!(records[1].steps, "1. Open\n2. Submit");
}
