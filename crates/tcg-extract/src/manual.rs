//! Regex field recovery for output no JSON parser accepts
//!
//! The text is cut into segments at each `"id": "<PREFIX>_<digits>"` occurrence and
//! every known field is pulled out of each segment by its own single-field pattern.
//! Only string-valued fields are recoverable this way.

use once_cell::sync::Lazy;
use regex::Regex;
use tcg_core::CandidateRecord;

/// Fields recovered per segment, in output order
pub const MANUAL_FIELDS: &[&str] = &[
    "id",
    "module",
    "submodule",
    "summary",
    "title",
    "steps",
    "testSteps",
    "expectedOutcome",
    "expectedResult",
    "category",
    "environment",
    "status",
];

/// Fields that can stand in for a summary
const SUMMARY_FIELDS: &[&str] = &["summary", "title"];

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)"id"\s*:\s*"[a-z][a-z0-9]*_\d+""#).expect("valid id pattern")
});

static FIELD_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    MANUAL_FIELDS
        .iter()
        .map(|field| {
            let pattern = format!(r#"(?i)"{}"\s*:\s*"([^"]*)""#, regex::escape(field));
            (*field, Regex::new(&pattern).expect("valid field pattern"))
        })
        .collect()
});

/// Recover candidates from `text`; empty when no segment carries a summary
#[must_use]
pub fn extract_fields(text: &str) -> Vec<CandidateRecord> {
    let starts: Vec<usize> = ID_PATTERN.find_iter(text).map(|m| m.start()).collect();

    let mut records = Vec::new();
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        if let Some(record) = extract_segment(&text[start..end]) {
            records.push(record);
        }
    }
    records
}

fn extract_segment(segment: &str) -> Option<CandidateRecord> {
    let mut record = CandidateRecord::new();
    for (field, pattern) in FIELD_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(segment) {
            let value = captures[1].replace("\\n", "\n");
            if !value.trim().is_empty() {
                record.insert(field, value);
            }
        }
    }

    record.first_text(SUMMARY_FIELDS).map(|_| record)
}
