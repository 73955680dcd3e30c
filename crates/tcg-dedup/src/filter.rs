//! Duplicate/similarity filter
//!
//! Returns the order-preserving subsequence of new records that duplicate neither the
//! caller's existing records nor any earlier survivor of the same batch.

use crate::report::FilterReport;
use crate::signature::RejectReason;
use crate::state::FilterState;
use serde::{Deserialize, Serialize};
use tcg_core::{NormalizedRecord, PipelineConfig, QualityConfig, SimilarityConfig};

/// A record the filter discarded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    /// Identifier of the discarded record
    pub record_id: String,
    /// Its summary
    pub summary: String,
    /// Which signal matched
    pub reason: RejectReason,
}

/// Result of one filter call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOutcome {
    /// Survivors in input order
    pub kept: Vec<NormalizedRecord>,
    /// Discarded records in input order
    pub rejected: Vec<Rejection>,
    /// Advisory diagnostics
    pub report: FilterReport,
}

/// Duplicate filter with fixed thresholds
#[derive(Debug, Clone, Default)]
pub struct DuplicateFilter {
    similarity: SimilarityConfig,
    quality: QualityConfig,
}

impl DuplicateFilter {
    /// Filter using the similarity and quality sections of `config`
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            similarity: config.similarity.clone(),
            quality: config.quality.clone(),
        }
    }

    /// Filter from explicit parts
    #[must_use]
    pub fn from_parts(similarity: SimilarityConfig, quality: QualityConfig) -> Self {
        Self { similarity, quality }
    }

    /// Fresh state seeded with `existing`
    #[must_use]
    pub fn state(&self, existing: &[NormalizedRecord]) -> FilterState {
        FilterState::seeded(existing, self.similarity.clone())
    }

    /// Drop near-duplicates from `new_records`
    #[must_use]
    pub fn filter(
        &self,
        new_records: Vec<NormalizedRecord>,
        existing: &[NormalizedRecord],
    ) -> FilterOutcome {
        let input = new_records.len();
        let mut state = self.state(existing);
        let mut kept = Vec::with_capacity(input);
        let mut rejected = Vec::new();

        for record in new_records {
            match state.admit(&record) {
                Ok(()) => kept.push(record),
                Err(reason) => {
                    tracing::debug!(
                        id = %record.id,
                        reason = reason.as_str(),
                        "Rejected duplicate record"
                    );
                    metrics::counter!("tcg_dedup_rejected_total", "reason" => reason.as_str())
                        .increment(1);
                    rejected.push(Rejection {
                        record_id: record.id,
                        summary: record.summary,
                        reason,
                    });
                }
            }
        }

        let report = FilterReport::new(input, &kept, &self.quality);
        report.log();

        FilterOutcome {
            kept,
            rejected,
            report,
        }
    }
}

/// Filter with the given configuration
#[must_use]
pub fn filter_duplicates(
    new_records: Vec<NormalizedRecord>,
    existing: &[NormalizedRecord],
    config: &PipelineConfig,
) -> FilterOutcome {
    DuplicateFilter::new(config).filter(new_records, existing)
}
