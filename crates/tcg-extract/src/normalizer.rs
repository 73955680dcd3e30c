//! Record normalizer
//!
//! Maps loosely typed candidates onto [`NormalizedRecord`]:
//! - alternate key spellings are coalesced, first non-empty value wins
//! - array-valued fields are flattened to newline-joined text
//! - missing ids are synthesized as `PREFIX_<position+1>`
//! - missing category, environment and status take configured defaults
//! - a missing summary falls back to a title-like field, then to a placeholder

use tcg_core::{CandidateRecord, NormalizedRecord, RecordDefaults, RecordKind};

const ID_KEYS: &[&str] = &["id", "testCaseId", "scenarioId"];
const MODULE_KEYS: &[&str] = &["module"];
const SUBMODULE_KEYS: &[&str] = &["submodule", "feature"];
const SUMMARY_KEYS: &[&str] = &["summary", "testCaseSummary", "scenarioSummary"];
const TITLE_KEYS: &[&str] = &["title", "name", "scenario", "description"];
const STEPS_KEYS: &[&str] = &["steps", "testSteps"];
const OUTCOME_KEYS: &[&str] = &["expectedOutcome", "expectedResult", "expected"];
const CATEGORY_KEYS: &[&str] = &["category", "type"];
const ENVIRONMENT_KEYS: &[&str] = &["environment"];
const STATUS_KEYS: &[&str] = &["status"];

/// Candidate-to-record mapping for one record kind
#[derive(Debug, Clone)]
pub struct Normalizer {
    kind: RecordKind,
    defaults: RecordDefaults,
}

impl Normalizer {
    /// Normalizer with default field values
    #[inline]
    #[must_use]
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            defaults: RecordDefaults::default(),
        }
    }

    /// With custom defaults
    #[inline]
    #[must_use]
    pub fn with_defaults(mut self, defaults: RecordDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Normalize candidates in order, dropping any without a usable summary
    #[must_use]
    pub fn normalize(&self, candidates: &[CandidateRecord]) -> Vec<NormalizedRecord> {
        let records: Vec<NormalizedRecord> = candidates
            .iter()
            .enumerate()
            .filter_map(|(position, candidate)| self.normalize_one(position, candidate))
            .collect();

        let dropped = candidates.len() - records.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Dropped candidates without summary");
        }
        records
    }

    /// Normalize the candidate at `position` (zero-based)
    #[must_use]
    pub fn normalize_one(&self, position: usize, candidate: &CandidateRecord) -> Option<NormalizedRecord> {
        let summary = candidate
            .first_text(SUMMARY_KEYS)
            .or_else(|| candidate.first_text(TITLE_KEYS))
            .unwrap_or_else(|| format!("Generated {} {}", self.kind.label(), position + 1));
        if summary.is_empty() {
            return None;
        }

        let text = |keys: &[&str]| candidate.first_text(keys).unwrap_or_default();
        let or_default =
            |keys: &[&str], default: &str| candidate.first_text(keys).unwrap_or_else(|| default.to_string());

        Some(NormalizedRecord {
            id: candidate
                .first_text(ID_KEYS)
                .unwrap_or_else(|| self.kind.synthesize_id(position)),
            module: text(MODULE_KEYS),
            submodule: text(SUBMODULE_KEYS),
            summary,
            steps: text(STEPS_KEYS),
            expected_outcome: text(OUTCOME_KEYS),
            category: or_default(CATEGORY_KEYS, &self.defaults.category),
            environment: or_default(ENVIRONMENT_KEYS, &self.defaults.environment),
            status: or_default(STATUS_KEYS, &self.defaults.status),
        })
    }
}

/// Normalize with default field values
#[must_use]
pub fn normalize(candidates: &[CandidateRecord], kind: RecordKind) -> Vec<NormalizedRecord> {
    Normalizer::new(kind).normalize(candidates)
}
