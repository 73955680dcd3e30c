//! Record types for the generation pipeline
//!
//! Two shapes flow through the pipeline:
//! - [`CandidateRecord`]: untrusted key/value mapping parsed from model output
//! - [`NormalizedRecord`]: fixed-shape, default-filled record ready for persistence
//!
//! Loosely typed values are held in the [`RawField`] sum type so that every coercion
//! happens in one place instead of through ad-hoc property access.

use crate::config::RecordDefaults;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The two record families the pipeline produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    /// Step-by-step test procedure
    TestCase,
    /// Higher-level test scenario
    Scenario,
}

impl RecordKind {
    /// Prefix used for synthesized identifiers (`PREFIX_<n>`)
    #[inline]
    #[must_use]
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::TestCase => "TC",
            Self::Scenario => "TS",
        }
    }

    /// Human-readable label
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::TestCase => "test case",
            Self::Scenario => "scenario",
        }
    }

    /// Synthesized identifier for the record at `position` (zero-based)
    #[must_use]
    pub fn synthesize_id(self, position: usize) -> String {
        format!("{}_{}", self.id_prefix(), position + 1)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TestCase => f.write_str("test-case"),
            Self::Scenario => f.write_str("scenario"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test-case" | "testcase" | "test_case" | "tc" => Ok(Self::TestCase),
            "scenario" | "ts" => Ok(Self::Scenario),
            other => Err(format!("unknown record kind: '{other}'")),
        }
    }
}

/// Raw parsed value from untrusted model output
#[derive(Debug, Clone, PartialEq)]
pub enum RawField {
    /// Scalar text (strings, numbers and booleans all land here)
    Text(String),
    /// Array input, one entry per element
    Lines(Vec<String>),
    /// Anything that has no textual reading (null, objects)
    Other(Value),
}

impl RawField {
    /// Coerce into a single string
    ///
    /// `Text` is trimmed, `Lines` are trimmed and joined with `\n`, `Other` is empty.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Lines(lines) => lines
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Other(_) => String::new(),
        }
    }

    /// Whether coercion yields an empty string
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.as_text().is_empty()
    }
}

impl From<&Value> for RawField {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s.clone()),
            Value::Number(n) => Self::Text(n.to_string()),
            Value::Bool(b) => Self::Text(b.to_string()),
            Value::Array(items) => Self::Lines(items.iter().filter_map(array_item_text).collect()),
            Value::Null | Value::Object(_) => Self::Other(value.clone()),
        }
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawField {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

fn array_item_text(item: &Value) -> Option<String> {
    let text = match item {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => item.to_string(),
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Canonical key form: lowercase ASCII alphanumerics only
///
/// `expectedResult`, `expected_result` and `Expected Result` all map to `expectedresult`.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Untrusted record parsed from model output
///
/// Keys are stored in canonical form (see [`normalize_key`]) in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateRecord {
    fields: IndexMap<String, RawField>,
}

impl CandidateRecord {
    /// Create empty candidate
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value; only objects qualify
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let mut record = Self::new();
        for (key, field) in map {
            record.insert(key, RawField::from(field));
        }
        Some(record)
    }

    /// Insert a field, replacing any value under the same canonical key
    pub fn insert(&mut self, key: impl AsRef<str>, field: impl Into<RawField>) {
        self.fields.insert(normalize_key(key.as_ref()), field.into());
    }

    /// Builder form of [`insert`](Self::insert)
    #[must_use]
    pub fn with(mut self, key: impl AsRef<str>, field: impl Into<RawField>) -> Self {
        self.insert(key, field);
        self
    }

    /// Look up a field by any spelling of its key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawField> {
        self.fields.get(&normalize_key(key))
    }

    /// First non-empty coerced value among `aliases`, in alias order
    #[must_use]
    pub fn first_text(&self, aliases: &[&str]) -> Option<String> {
        aliases
            .iter()
            .filter_map(|alias| self.get(alias))
            .map(RawField::as_text)
            .find(|text| !text.is_empty())
    }

    /// Canonical keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the candidate has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Fully typed, default-filled record
///
/// Invariants upheld by the normalizer: `id` and `summary` are non-empty and `steps`
/// is a single string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    /// Short identifier, model-assigned or `PREFIX_<n>`
    pub id: String,
    /// Functional area
    #[serde(default)]
    pub module: String,
    /// Feature within the module
    #[serde(default)]
    pub submodule: String,
    /// One-line description
    pub summary: String,
    /// Newline-separated procedure
    #[serde(default)]
    pub steps: String,
    /// Expected result
    #[serde(default)]
    pub expected_outcome: String,
    /// "Positive", "Negative", ...
    #[serde(default)]
    pub category: String,
    /// Target environment
    #[serde(default)]
    pub environment: String,
    /// Execution status
    #[serde(default)]
    pub status: String,
}

impl NormalizedRecord {
    /// Spreadsheet column order used by [`to_row`](Self::to_row)
    pub const COLUMNS: [&'static str; 9] = [
        "id",
        "module",
        "submodule",
        "summary",
        "steps",
        "expectedOutcome",
        "category",
        "environment",
        "status",
    ];

    /// Create record with default category, environment and status
    #[must_use]
    pub fn new(id: impl Into<String>, summary: impl Into<String>) -> Self {
        let defaults = RecordDefaults::default();
        Self {
            id: id.into(),
            module: String::new(),
            submodule: String::new(),
            summary: summary.into(),
            steps: String::new(),
            expected_outcome: String::new(),
            category: defaults.category,
            environment: defaults.environment,
            status: defaults.status,
        }
    }

    /// With module and submodule
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>, submodule: impl Into<String>) -> Self {
        self.module = module.into();
        self.submodule = submodule.into();
        self
    }

    /// With steps
    #[must_use]
    pub fn with_steps(mut self, steps: impl Into<String>) -> Self {
        self.steps = steps.into();
        self
    }

    /// With expected outcome
    #[must_use]
    pub fn with_expected_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.expected_outcome = outcome.into();
        self
    }

    /// With category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// With identifier
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Field values in [`COLUMNS`](Self::COLUMNS) order
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.module.clone(),
            self.submodule.clone(),
            self.summary.clone(),
            self.steps.clone(),
            self.expected_outcome.clone(),
            self.category.clone(),
            self.environment.clone(),
            self.status.clone(),
        ]
    }
}

/// Which extraction strategy produced the candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSource {
    /// Strict JSON parse of the bracketed array
    Strict,
    /// JSON parse after trailing-comma and control-character repair
    Repaired,
    /// Per-field regex recovery
    Manual,
    /// Static placeholder dataset; no real model content
    Fallback,
}

impl ExtractionSource {
    /// Stable name for logs and metrics labels
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Repaired => "repaired",
            Self::Manual => "manual",
            Self::Fallback => "fallback",
        }
    }

    /// Whether the records are placeholders rather than model output
    #[inline]
    #[must_use]
    pub fn is_synthetic(self) -> bool {
        matches!(self, Self::Fallback)
    }
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged extractor result
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Candidates in source order; never empty
    pub records: Vec<CandidateRecord>,
    /// Strategy that produced them
    pub source: ExtractionSource,
}

impl Extraction {
    /// Whether the records are placeholders
    #[inline]
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.source.is_synthetic()
    }
}
