//! Per-invocation duplicate filter state
//!
//! One `FilterState` is created for each filter call, seeded from the caller's
//! existing records, and grows only when a record is admitted. Nothing is shared
//! between calls.

use crate::signature::{PurposeSignature, RecordSignature, RejectReason, StepSignature};
use std::collections::HashSet;
use tcg_core::{NormalizedRecord, SimilarityConfig};

/// Accumulated signatures of every record seen so far
#[derive(Debug, Clone)]
pub struct FilterState {
    config: SimilarityConfig,
    summaries: HashSet<String>,
    steps: Vec<StepSignature>,
    purposes: Vec<PurposeSignature>,
}

impl FilterState {
    /// Empty state
    #[must_use]
    pub fn new(config: SimilarityConfig) -> Self {
        Self {
            config,
            summaries: HashSet::new(),
            steps: Vec::new(),
            purposes: Vec::new(),
        }
    }

    /// State seeded with every record in `existing`
    #[must_use]
    pub fn seeded(existing: &[NormalizedRecord], config: SimilarityConfig) -> Self {
        let mut state = Self::new(config);
        for record in existing {
            let signature = state.signature(record);
            state.remember(signature);
        }
        state
    }

    /// Signals for `record` under this state's configuration
    #[must_use]
    pub fn signature(&self, record: &NormalizedRecord) -> RecordSignature {
        RecordSignature::of(record, &self.config)
    }

    /// Why `signature` duplicates something already seen, if it does
    #[must_use]
    pub fn check(&self, signature: &RecordSignature) -> Option<RejectReason> {
        if !signature.summary.is_empty() && self.summaries.contains(&signature.summary) {
            return Some(RejectReason::ExactSummary);
        }

        let threshold = self.config.step_threshold;
        if let Some(score) = self
            .steps
            .iter()
            .map(|seen| signature.steps.similarity(seen, &self.config))
            .find(|score| *score > 0.0 && *score >= threshold)
        {
            return Some(RejectReason::SimilarSteps { score });
        }

        let threshold = self.config.purpose_threshold;
        self.purposes
            .iter()
            .map(|seen| signature.purpose.overlap(seen))
            .find(|score| *score > 0.0 && *score >= threshold)
            .map(|score| RejectReason::SimilarPurpose { score })
    }

    /// Record `signature` as seen; empty signals are not stored
    pub fn remember(&mut self, signature: RecordSignature) {
        if !signature.summary.is_empty() {
            self.summaries.insert(signature.summary);
        }
        if !signature.steps.is_empty() {
            self.steps.push(signature.steps);
        }
        if !signature.purpose.is_empty() {
            self.purposes.push(signature.purpose);
        }
    }

    /// Check `record` and remember it when it is not a duplicate
    pub fn admit(&mut self, record: &NormalizedRecord) -> Result<(), RejectReason> {
        let signature = self.signature(record);
        match self.check(&signature) {
            Some(reason) => Err(reason),
            None => {
                self.remember(signature);
                Ok(())
            }
        }
    }

    /// Number of distinct summaries seen
    #[inline]
    #[must_use]
    pub fn seen_summaries(&self) -> usize {
        self.summaries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_state_rejects_existing_summary() {
        let existing = vec![NormalizedRecord::new("TC_1", "Export report as PDF")];
        let mut state = FilterState::seeded(&existing, SimilarityConfig::default());

        let dup = NormalizedRecord::new("TC_7", "export report as pdf");
        assert_eq!(state.admit(&dup), Err(RejectReason::ExactSummary));
        assert_eq!(state.seen_summaries(), 1);
    }

    #[test]
    fn rejected_records_are_not_remembered() {
        let mut state = FilterState::new(SimilarityConfig::default());
        let first = NormalizedRecord::new("TC_1", "Archive project");
        assert!(state.admit(&first).is_ok());
        assert!(state.admit(&first.clone().with_id("TC_2")).is_err());
        assert_eq!(state.seen_summaries(), 1);
    }

    #[test]
    fn distinct_records_admitted() {
        let mut state = FilterState::new(SimilarityConfig::default());
        let a = NormalizedRecord::new("TC_1", "Upload profile photo").with_steps("Open profile, choose image file");
        let b = NormalizedRecord::new("TC_2", "Reset forgotten password").with_steps("Request reset email, follow link");
        assert!(state.admit(&a).is_ok());
        assert!(state.admit(&b).is_ok());
    }
}
