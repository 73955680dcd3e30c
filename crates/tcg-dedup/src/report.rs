//! Advisory quality diagnostics
//!
//! None of these flags fail a generation; they are logged and returned so callers can
//! surface them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tcg_core::{NormalizedRecord, QualityConfig};

/// Variety and balance of a set of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySnapshot {
    /// Distinct non-empty submodules (case-insensitive)
    pub distinct_submodules: usize,
    /// Fewer distinct submodules than configured
    pub low_variety: bool,
    /// Record count per category
    pub category_counts: BTreeMap<String, usize>,
    /// One category dominates the set
    pub imbalanced: bool,
}

impl QualitySnapshot {
    /// Measure `records`
    #[must_use]
    pub fn measure(records: &[NormalizedRecord], quality: &QualityConfig) -> Self {
        let distinct_submodules = records
            .iter()
            .map(|r| r.submodule.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect::<BTreeSet<_>>()
            .len();

        let mut category_counts = BTreeMap::new();
        for record in records {
            *category_counts.entry(record.category.clone()).or_insert(0) += 1;
        }

        let largest = category_counts.values().copied().max().unwrap_or(0);
        #[allow(clippy::cast_precision_loss)]
        let imbalanced = records.len() >= quality.min_records_for_balance
            && largest as f64 / records.len() as f64 > quality.max_category_share;

        Self {
            distinct_submodules,
            low_variety: !records.is_empty() && distinct_submodules < quality.min_submodule_variety,
            category_counts,
            imbalanced,
        }
    }
}

/// Outcome statistics of one filter call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Records offered to the filter
    pub input: usize,
    /// Records that survived
    pub kept: usize,
    /// Records rejected as duplicates
    pub discarded: usize,
    /// kept / input (1.0 for empty input)
    pub survival_ratio: f64,
    /// Survival ratio below the configured minimum
    pub low_survival: bool,
    /// Variety and balance of the survivors
    #[serde(flatten)]
    pub quality: QualitySnapshot,
}

impl FilterReport {
    /// Build report for `kept` survivors out of `input` candidates
    #[must_use]
    pub fn new(input: usize, kept: &[NormalizedRecord], quality: &QualityConfig) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let survival_ratio = if input == 0 {
            1.0
        } else {
            kept.len() as f64 / input as f64
        };
        Self {
            input,
            kept: kept.len(),
            discarded: input.saturating_sub(kept.len()),
            survival_ratio,
            low_survival: input > 0 && survival_ratio < quality.min_survival_ratio,
            quality: QualitySnapshot::measure(kept, quality),
        }
    }

    /// Whether any advisory flag is raised
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.low_survival || self.quality.low_variety || self.quality.imbalanced
    }

    /// Emit the report through `tracing`
    pub fn log(&self) {
        tracing::info!(
            input = self.input,
            kept = self.kept,
            discarded = self.discarded,
            "Duplicate filter finished"
        );
        if self.low_survival {
            tracing::warn!(
                survival_ratio = self.survival_ratio,
                "Most generated records were duplicates; consider more specific input"
            );
        }
        if self.quality.low_variety {
            tracing::warn!(
                distinct_submodules = self.quality.distinct_submodules,
                "Low submodule variety among generated records"
            );
        }
        if self.quality.imbalanced {
            tracing::warn!(
                categories = ?self.quality.category_counts,
                "Generated records dominated by a single category"
            );
        }
    }
}
