//! Static placeholder datasets
//!
//! Returned when nothing can be recovered from model output. Every record is marked
//! `[Placeholder]` in its summary and module so it is recognizable once persisted.

use tcg_core::{CandidateRecord, RecordKind};

/// Marker carried by every placeholder summary and module
pub const PLACEHOLDER_MARKER: &str = "[Placeholder]";

/// (summary, category, steps) templates for test cases
const TEST_CASE_TEMPLATES: &[Template] = &[
    (
        "Verify the primary workflow completes with valid input",
        "Positive",
        "1. Open the feature\n2. Fill every required field with valid data\n3. Submit the form",
    ),
    (
        "Reject submission when required fields are empty",
        "Negative",
        "1. Open the form\n2. Leave required inputs blank\n3. Press save",
    ),
    (
        "Show a validation message for malformed input",
        "Negative",
        "1. Type malformed characters into an input\n2. Trigger validation",
    ),
    (
        "Persist saved data after the page is reloaded",
        "Positive",
        "1. Save a record\n2. Reload the browser tab\n3. Inspect stored values",
    ),
    (
        "Deny access to the feature without permission",
        "Negative",
        "1. Sign in as a restricted account\n2. Navigate directly to the protected screen",
    ),
];

/// (summary, category, steps) templates for scenarios
const SCENARIO_TEMPLATES: &[Template] = &[
    (
        "End-to-end happy path for the feature",
        "Positive",
        "1. Start from the landing page\n2. Complete the main journey\n3. Confirm the final screen",
    ),
    (
        "Error handling for invalid user actions",
        "Negative",
        "1. Perform an action with invalid data\n2. Observe the error message",
    ),
    (
        "Boundary values and limits of the feature",
        "Negative",
        "1. Enter minimum allowed values\n2. Enter maximum allowed values\n3. Exceed the limits",
    ),
];

type Template = (&'static str, &'static str, &'static str);

/// Number of placeholder records produced for `kind`
#[must_use]
pub fn fallback_len(kind: RecordKind) -> usize {
    templates(kind).len()
}

/// Deterministic placeholder candidates for `kind`
#[must_use]
pub fn fallback_records(kind: RecordKind) -> Vec<CandidateRecord> {
    templates(kind)
        .iter()
        .enumerate()
        .map(|(i, (summary, category, steps))| {
            CandidateRecord::new()
                .with("id", kind.synthesize_id(i))
                .with("module", PLACEHOLDER_MARKER)
                .with("submodule", format!("Placeholder {}", i + 1))
                .with("summary", format!("{PLACEHOLDER_MARKER} {summary}"))
                .with("steps", *steps)
                .with("expectedOutcome", "Placeholder; no expected outcome was generated")
                .with("category", *category)
        })
        .collect()
}

fn templates(kind: RecordKind) -> &'static [Template] {
    match kind {
        RecordKind::TestCase => TEST_CASE_TEMPLATES,
        RecordKind::Scenario => SCENARIO_TEMPLATES,
    }
}
