//! Prompt composition
//!
//! Builds the instruction text sent to the model: the requested JSON array shape, the
//! field names the extractor looks for, and the summaries that must not be repeated.

use std::fmt::Write as _;
use tcg_core::{NormalizedRecord, RecordKind};

/// Maximum number of existing summaries listed in a prompt
pub const MAX_EXISTING_SUMMARIES: usize = 50;

/// Default number of records requested
pub const DEFAULT_COUNT: usize = 5;

/// Builder for a generation prompt
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    kind: RecordKind,
    module: String,
    submodule: Option<String>,
    summary: String,
    acceptance_criteria: Option<String>,
    count: usize,
    existing: Vec<String>,
}

impl PromptBuilder {
    /// New builder for `kind`
    #[must_use]
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            module: String::new(),
            submodule: None,
            summary: String::new(),
            acceptance_criteria: None,
            count: DEFAULT_COUNT,
            existing: Vec::new(),
        }
    }

    /// Functional area under test
    #[inline]
    #[must_use]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Feature within the module
    #[inline]
    #[must_use]
    pub fn submodule(mut self, submodule: impl Into<String>) -> Self {
        self.submodule = Some(submodule.into());
        self
    }

    /// Description of the feature or user story
    #[inline]
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Acceptance criteria the records must cover
    #[inline]
    #[must_use]
    pub fn acceptance_criteria(mut self, criteria: impl Into<String>) -> Self {
        self.acceptance_criteria = Some(criteria.into());
        self
    }

    /// Number of records to request (at least one)
    #[inline]
    #[must_use]
    pub fn count(mut self, count: usize) -> Self {
        self.count = count.max(1);
        self
    }

    /// Records already stored; their summaries are listed as off-limits
    #[must_use]
    pub fn existing(mut self, records: &[NormalizedRecord]) -> Self {
        self.existing = records
            .iter()
            .map(|r| r.summary.trim())
            .filter(|s| !s.is_empty())
            .take(MAX_EXISTING_SUMMARIES)
            .map(str::to_string)
            .collect();
        self
    }

    /// Compose the prompt text
    #[must_use]
    pub fn build(&self) -> String {
        let label = self.kind.label();
        let prefix = self.kind.id_prefix();
        let mut prompt = String::new();

        let _ = writeln!(
            prompt,
            "You are a senior QA engineer. Generate {} distinct {label}s for the feature below.",
            self.count
        );
        prompt.push('\n');
        let _ = writeln!(prompt, "Module: {}", self.module.trim());
        if let Some(submodule) = self.submodule.as_deref().filter(|s| !s.trim().is_empty()) {
            let _ = writeln!(prompt, "Submodule: {}", submodule.trim());
        }
        let _ = writeln!(prompt, "Feature summary: {}", self.summary.trim());
        if let Some(criteria) = self.acceptance_criteria.as_deref().filter(|s| !s.trim().is_empty()) {
            let _ = writeln!(prompt, "Acceptance criteria:\n{}", criteria.trim());
        }

        prompt.push('\n');
        let _ = writeln!(
            prompt,
            "Respond with only a JSON array of {} objects and no other text.",
            self.count
        );
        let _ = writeln!(prompt, "Each object must have these fields:");
        let _ = writeln!(prompt, "- \"id\": \"{prefix}_1\", \"{prefix}_2\", ... in order");
        prompt.push_str(concat!(
            "- \"module\": the module name\n",
            "- \"submodule\": the specific feature area\n",
            "- \"summary\": one line stating what is verified\n",
            "- \"steps\": an array of short imperative steps\n",
            "- \"expectedOutcome\": the observable result\n",
            "- \"category\": \"Positive\" or \"Negative\"\n",
        ));
        prompt.push_str("Cover several submodules and mix positive and negative cases.\n");

        if !self.existing.is_empty() {
            prompt.push('\n');
            let _ = writeln!(
                prompt,
                "These {label}s already exist; do not repeat or paraphrase them:"
            );
            for summary in &self.existing {
                let _ = writeln!(prompt, "- {summary}");
            }
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_shape_prefix_and_count() {
        let prompt = PromptBuilder::new(RecordKind::Scenario)
            .module("Checkout")
            .submodule("Coupons")
            .summary("Apply discount codes at checkout")
            .acceptance_criteria("Expired codes are refused")
            .count(7)
            .build();

        assert!(prompt.contains("Generate 7 distinct scenarios"));
        assert!(prompt.contains("Module: Checkout\nSubmodule: Coupons\n"));
        assert!(prompt.contains("Acceptance criteria:\nExpired codes are refused\n"));
        assert!(prompt.contains("\"TS_1\""));
        assert!(prompt.contains("\"expectedOutcome\""));
        assert!(!prompt.contains("already exist"));
    }

    #[test]
    fn existing_summaries_are_capped() {
        let existing: Vec<_> = (0..60)
            .map(|i| NormalizedRecord::new(format!("TC_{i}"), format!("Existing summary {i}")))
            .collect();
        let prompt = PromptBuilder::new(RecordKind::TestCase)
            .module("Billing")
            .summary("Invoices")
            .existing(&existing)
            .build();

        assert!(prompt.contains("- Existing summary 49\n"));
        assert!(!prompt.contains("Existing summary 50"));
    }

    #[test]
    fn build_is_deterministic() {
        let builder = PromptBuilder::new(RecordKind::TestCase).module("A").summary("B").count(0);
        assert_eq!(builder.build(), builder.build());
        assert!(builder.build().contains("Generate 1 distinct test cases"));
    }
}
