//! Corpus analysis
//!
//! Summarizes an existing set of records: coverage per category, module and
//! submodule, plus every record that duplicates an earlier one by the same three
//! signals the filter uses.

use crate::report::QualitySnapshot;
use crate::signature::{RecordSignature, RejectReason};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tcg_core::{NormalizedRecord, PipelineConfig};

/// A record that duplicates an earlier one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearDuplicate {
    /// Later record
    pub record_id: String,
    /// Earliest record it duplicates
    pub duplicate_of: String,
    /// Matching signal
    pub reason: RejectReason,
}

/// Coverage and duplication summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusAnalysis {
    /// Number of records analyzed
    pub total: usize,
    /// Records per module (empty module reported as "(none)")
    pub by_module: BTreeMap<String, usize>,
    /// Records per "module / submodule"
    pub by_submodule: BTreeMap<String, usize>,
    /// Duplicated records, in record order
    pub near_duplicates: Vec<NearDuplicate>,
    /// Variety and balance flags
    #[serde(flatten)]
    pub quality: QualitySnapshot,
}

/// Analyze `records`
///
/// Pairwise comparison against all earlier records; intended for sheet-sized inputs.
#[must_use]
pub fn analyze(records: &[NormalizedRecord], config: &PipelineConfig) -> CorpusAnalysis {
    let mut by_module = BTreeMap::new();
    let mut by_submodule = BTreeMap::new();
    for record in records {
        let module = label(&record.module);
        *by_submodule
            .entry(format!("{module} / {}", label(&record.submodule)))
            .or_insert(0) += 1;
        *by_module.entry(module).or_insert(0) += 1;
    }

    let signatures: Vec<RecordSignature> = records
        .iter()
        .map(|r| RecordSignature::of(r, &config.similarity))
        .collect();

    let mut near_duplicates = Vec::new();
    for (i, signature) in signatures.iter().enumerate() {
        let earlier = signatures[..i]
            .iter()
            .enumerate()
            .find_map(|(j, other)| signature.duplicate_of(other, &config.similarity).map(|r| (j, r)));
        if let Some((j, reason)) = earlier {
            near_duplicates.push(NearDuplicate {
                record_id: records[i].id.clone(),
                duplicate_of: records[j].id.clone(),
                reason,
            });
        }
    }

    tracing::info!(
        total = records.len(),
        near_duplicates = near_duplicates.len(),
        "Analyzed record corpus"
    );

    CorpusAnalysis {
        total: records.len(),
        by_module,
        by_submodule,
        near_duplicates,
        quality: QualitySnapshot::measure(records, &config.quality),
    }
}

fn label(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "(none)".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_duplicates() {
        let records = vec![
            NormalizedRecord::new("TC_1", "Create invoice").with_module("Billing", "Invoices"),
            NormalizedRecord::new("TC_2", "Void invoice").with_module("Billing", "Invoices"),
            NormalizedRecord::new("TC_3", "create INVOICE").with_module("Billing", "Drafts"),
            NormalizedRecord::new("TC_4", "Print receipt"),
        ];

        let analysis = analyze(&records, &PipelineConfig::default());

        assert_eq!(analysis.total, 4);
        assert_eq!(analysis.by_module.get("Billing"), Some(&3));
        assert_eq!(analysis.by_module.get("(none)"), Some(&1));
        assert_eq!(analysis.by_submodule.get("Billing / Invoices"), Some(&2));
        assert_eq!(
            analysis.near_duplicates,
            vec![NearDuplicate {
                record_id: "TC_3".into(),
                duplicate_of: "TC_1".into(),
                reason: RejectReason::ExactSummary,
            }]
        );
        assert!(analysis.quality.low_variety);
    }

    #[test]
    fn analysis_reports_every_later_duplicate() {
        let records = vec![
            NormalizedRecord::new("A", "Same"),
            NormalizedRecord::new("B", "same"),
            NormalizedRecord::new("C", "SAME"),
        ];
        let analysis = analyze(&records, &PipelineConfig::default());
        let pairs: Vec<_> = analysis
            .near_duplicates
            .iter()
            .map(|d| (d.record_id.as_str(), d.duplicate_of.as_str()))
            .collect();
        assert_eq!(pairs, vec![("B", "A"), ("C", "A")]);
    }
}
