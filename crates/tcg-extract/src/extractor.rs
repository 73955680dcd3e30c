//! Structured-text extractor
//!
//! Turns raw model output into candidate records through a cascade of increasingly
//! lenient strategies; the first strategy that yields records wins:
//!
//! ```text
//! raw → strip fences → [ ... ] span ─┬→ StrictJson ─→ RepairedJson ─┐
//!                                     └──────── (no span) ──────────┴→ ManualFields → fallback
//! ```
//!
//! Extraction never fails. When every strategy comes up empty the kind-specific
//! placeholder dataset is returned, tagged [`ExtractionSource::Fallback`].

use crate::fallback::fallback_records;
use crate::manual::extract_fields;
use crate::repair::repair_json;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tcg_core::{CandidateRecord, Extraction, ExtractionSource, RecordKind};

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```[ \t]*(?:json)?").expect("valid fence pattern"));

/// Model output after fence stripping, with the candidate array span located
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedText {
    /// Text with Markdown code-fence markers removed
    pub cleaned: String,
    /// Byte span of the first `[` through the last `]`, when well ordered
    pub array_span: Option<(usize, usize)>,
}

impl PreparedText {
    /// Strip fences and locate the bracketed array
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let cleaned = CODE_FENCE.replace_all(raw, "").into_owned();
        let array_span = match (cleaned.find('['), cleaned.rfind(']')) {
            (Some(open), Some(close)) if open < close => Some((open, close)),
            _ => None,
        };
        Self {
            cleaned,
            array_span,
        }
    }

    /// The bracketed substring, inclusive of both brackets
    #[must_use]
    pub fn array_text(&self) -> Option<&str> {
        self.array_span.map(|(open, close)| &self.cleaned[open..=close])
    }
}

/// One step of the extraction cascade
///
/// Implement this trait to add a recovery technique; return `None` when the strategy
/// recovers nothing so the cascade moves on.
pub trait ExtractionStrategy: Send + Sync {
    /// Tag attached to records this strategy produces
    fn source(&self) -> ExtractionSource;

    /// Attempt recovery
    fn extract(&self, text: &PreparedText) -> Option<Vec<CandidateRecord>>;
}

/// Strict JSON parse of the bracketed array
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictJson;

impl ExtractionStrategy for StrictJson {
    fn source(&self) -> ExtractionSource {
        ExtractionSource::Strict
    }

    fn extract(&self, text: &PreparedText) -> Option<Vec<CandidateRecord>> {
        parse_array(text.array_text()?)
    }
}

/// JSON parse after trailing-comma and control-character repair
#[derive(Debug, Clone, Copy, Default)]
pub struct RepairedJson;

impl ExtractionStrategy for RepairedJson {
    fn source(&self) -> ExtractionSource {
        ExtractionSource::Repaired
    }

    fn extract(&self, text: &PreparedText) -> Option<Vec<CandidateRecord>> {
        parse_array(&repair_json(text.array_text()?))
    }
}

/// Per-field regex recovery over the whole cleaned text
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualFields;

impl ExtractionStrategy for ManualFields {
    fn source(&self) -> ExtractionSource {
        ExtractionSource::Manual
    }

    fn extract(&self, text: &PreparedText) -> Option<Vec<CandidateRecord>> {
        let records = extract_fields(&text.cleaned);
        (!records.is_empty()).then_some(records)
    }
}

fn parse_array(json: &str) -> Option<Vec<CandidateRecord>> {
    let value: Value = serde_json::from_str(json).ok()?;
    let records: Vec<CandidateRecord> = value
        .as_array()?
        .iter()
        .filter_map(CandidateRecord::from_json)
        .collect();
    (!records.is_empty()).then_some(records)
}

/// Strategy cascade bound to a record kind
pub struct Extractor {
    kind: RecordKind,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("kind", &self.kind)
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.source()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Extractor {
    /// Extractor with the standard strict → repaired → manual cascade
    #[must_use]
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            strategies: vec![
                Box::new(StrictJson),
                Box::new(RepairedJson),
                Box::new(ManualFields),
            ],
        }
    }

    /// Extractor with a custom cascade; the fallback dataset still terminates it
    #[must_use]
    pub fn with_strategies(kind: RecordKind, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { kind, strategies }
    }

    /// Record kind used for the fallback dataset
    #[inline]
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Extract candidates from raw model output; never empty
    #[must_use]
    pub fn extract(&self, raw: &str) -> Extraction {
        let prepared = PreparedText::new(raw);
        if prepared.array_span.is_none() {
            tracing::debug!("No bracketed array in model output; skipping JSON strategies");
        }

        for strategy in &self.strategies {
            let source = strategy.source();
            tracing::debug!(strategy = source.as_str(), "Trying extraction strategy");
            if let Some(records) = strategy.extract(&prepared) {
                tracing::info!(
                    strategy = source.as_str(),
                    count = records.len(),
                    "Extracted candidate records"
                );
                return finish(records, source);
            }
        }

        tracing::warn!(
            kind = %self.kind,
            raw_len = raw.len(),
            "Model output unrecoverable; returning placeholder records"
        );
        finish(fallback_records(self.kind), ExtractionSource::Fallback)
    }
}

fn finish(records: Vec<CandidateRecord>, source: ExtractionSource) -> Extraction {
    metrics::counter!("tcg_extract_source_total", "source" => source.as_str()).increment(1);
    Extraction { records, source }
}

/// Extract candidates with the standard cascade
#[must_use]
pub fn extract_records(raw: &str, kind: RecordKind) -> Extraction {
    Extractor::new(kind).extract(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::fallback_len;

    #[test]
    fn fenced_json_parses_strictly() {
        let raw = "Sure! ```json\n[{\"id\":\"PC_1\",\"summary\":\"Login with valid credentials\",\"steps\":[\"Open\",\"Submit\"]}]\n```";
        let extraction = extract_records(raw, RecordKind::TestCase);

        assert_eq!(extraction.source, ExtractionSource::Strict);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].first_text(&["id"]), Some("PC_1".into()));
    }

    #[test]
    fn trailing_comma_uses_repair() {
        let raw = r#"[{"id":"TC_1","summary":"A"},{"id":"TC_2","summary":"B"},]"#;
        let extraction = extract_records(raw, RecordKind::TestCase);

        assert_eq!(extraction.source, ExtractionSource::Repaired);
        assert_eq!(extraction.records.len(), 2);
    }

    #[test]
    fn literal_newlines_in_strings_use_repair() {
        let raw = "[{\"id\":\"TC_1\",\"summary\":\"A\",\"steps\":\"1. Open\n2. Save\"}]";
        let extraction = extract_records(raw, RecordKind::TestCase);

        assert_eq!(extraction.source, ExtractionSource::Repaired);
        assert_eq!(extraction.records[0].first_text(&["steps"]), Some("1. Open\n2. Save".into()));
    }

    #[test]
    fn truncated_output_uses_manual_recovery() {
        let raw = r#"[{"id": "TC_1", "summary": "Create account"}, {"id": "TC_2", "summary": "Delete acc"#;
        let extraction = extract_records(raw, RecordKind::TestCase);

        assert_eq!(extraction.source, ExtractionSource::Manual);
        assert_eq!(extraction.records.len(), 1);
    }

    #[test]
    fn refusal_returns_fallback() {
        let extraction = extract_records("I cannot help with that request.", RecordKind::TestCase);

        assert!(extraction.is_synthetic());
        assert_eq!(extraction.records.len(), fallback_len(RecordKind::TestCase));
    }

    #[test]
    fn reversed_brackets_skip_json() {
        let prepared = PreparedText::new("] nothing [");
        assert_eq!(prepared.array_span, None);
        assert!(extract_records("] nothing [", RecordKind::Scenario).is_synthetic());
    }

    #[test]
    fn array_without_objects_falls_through() {
        let extraction = extract_records("[1, 2, 3]", RecordKind::Scenario);
        assert_eq!(extraction.source, ExtractionSource::Fallback);
        assert_eq!(extraction.records.len(), fallback_len(RecordKind::Scenario));
    }

    #[test]
    fn empty_strategy_list_goes_straight_to_fallback() {
        let extractor = Extractor::with_strategies(RecordKind::TestCase, Vec::new());
        let extraction = extractor.extract(r#"[{"summary": "ok"}]"#);
        assert!(extraction.is_synthetic());
    }
}
