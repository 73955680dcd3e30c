//! Record signatures and similarity measures
//!
//! Three complementary signals decide whether two records are the same test:
//! - **summary key**: lower-cased, whitespace-collapsed summary (exact match)
//! - **step signature**: procedure text without numbering or punctuation, compared by
//!   token-set Jaccard plus a bonus per shared action verb
//! - **purpose signature**: first few intent-bearing summary words, compared by overlap

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tcg_core::{NormalizedRecord, SimilarityConfig};

static STEP_NUMBERING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(?:^|\s)(?:step\s*)?\d+\s*[.):]").expect("valid numbering pattern")
});

/// Why a record was judged a duplicate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// Summary identical after case and whitespace folding
    ExactSummary,
    /// Step signatures at or above the step threshold
    SimilarSteps {
        /// Similarity that triggered the rejection
        score: f64,
    },
    /// Purpose signatures at or above the purpose threshold
    SimilarPurpose {
        /// Overlap that triggered the rejection
        score: f64,
    },
}

impl RejectReason {
    /// Stable name for logs and metrics labels
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactSummary => "exact_summary",
            Self::SimilarSteps { .. } => "similar_steps",
            Self::SimilarPurpose { .. } => "similar_purpose",
        }
    }
}

/// Exact-match key for a summary
#[must_use]
pub fn summary_key(summary: &str) -> String {
    summary
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized procedure text and its comparison tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSignature {
    text: String,
    tokens: BTreeSet<String>,
}

impl StepSignature {
    /// Build from raw steps text
    #[must_use]
    pub fn new(steps: &str, config: &SimilarityConfig) -> Self {
        let lowered = steps.to_lowercase();
        let unnumbered = STEP_NUMBERING.replace_all(&lowered, " ");
        let text = unnumbered
            .chars()
            .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let tokens = text
            .split(' ')
            .filter(|t| t.chars().count() >= config.min_token_len)
            .map(str::to_string)
            .collect();
        Self { text, tokens }
    }

    /// Normalized text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether there is nothing to compare
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Jaccard similarity plus shared action-verb bonus, capped at 1.0
    ///
    /// Signatures without tokens are never similar to anything.
    #[must_use]
    pub fn similarity(&self, other: &Self, config: &SimilarityConfig) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        let shared = self.tokens.intersection(&other.tokens).count();
        let union = self.tokens.union(&other.tokens).count();
        let jaccard = ratio(shared, union);

        let shared_verbs = config
            .action_verbs
            .iter()
            .filter(|verb| self.text.contains(verb.as_str()) && other.text.contains(verb.as_str()))
            .count();
        #[allow(clippy::cast_precision_loss)]
        let bonus = shared_verbs as f64 * config.action_verb_bonus;

        (jaccard + bonus).min(1.0)
    }
}

/// Intent keywords drawn from a summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurposeSignature {
    words: Vec<String>,
}

impl PurposeSignature {
    /// First `purpose_signature_len` distinct summary words that are purpose verbs or
    /// at least `purpose_word_min_len` characters long
    #[must_use]
    pub fn new(summary: &str, config: &SimilarityConfig) -> Self {
        let mut words: Vec<String> = Vec::with_capacity(config.purpose_signature_len);
        let lowered = summary.to_lowercase();
        for word in lowered.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            if words.len() == config.purpose_signature_len {
                break;
            }
            let qualifies = config.purpose_verbs.iter().any(|v| v == word)
                || word.chars().count() >= config.purpose_word_min_len;
            if qualifies && !words.iter().any(|w| w == word) {
                words.push(word.to_string());
            }
        }
        Self { words }
    }

    /// Signature words in summary order
    #[inline]
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Whether there is nothing to compare
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Shared words over distinct words across both signatures
    #[must_use]
    pub fn overlap(&self, other: &Self) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        let a: BTreeSet<&str> = self.words.iter().map(String::as_str).collect();
        let b: BTreeSet<&str> = other.words.iter().map(String::as_str).collect();
        ratio(a.intersection(&b).count(), a.union(&b).count())
    }
}

/// All three signals for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSignature {
    /// Exact-match summary key
    pub summary: String,
    /// Procedure signature
    pub steps: StepSignature,
    /// Intent signature
    pub purpose: PurposeSignature,
}

impl RecordSignature {
    /// Compute signals for `record`
    #[must_use]
    pub fn of(record: &NormalizedRecord, config: &SimilarityConfig) -> Self {
        Self {
            summary: summary_key(&record.summary),
            steps: StepSignature::new(&record.steps, config),
            purpose: PurposeSignature::new(&record.summary, config),
        }
    }

    /// First signal (in summary, steps, purpose order) marking `self` a duplicate of `other`
    #[must_use]
    pub fn duplicate_of(&self, other: &Self, config: &SimilarityConfig) -> Option<RejectReason> {
        if !self.summary.is_empty() && self.summary == other.summary {
            return Some(RejectReason::ExactSummary);
        }
        let score = self.steps.similarity(&other.steps, config);
        if score >= config.step_threshold && score > 0.0 {
            return Some(RejectReason::SimilarSteps { score });
        }
        let score = self.purpose.overlap(&other.purpose);
        if score >= config.purpose_threshold && score > 0.0 {
            return Some(RejectReason::SimilarPurpose { score });
        }
        None
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimilarityConfig {
        SimilarityConfig::default()
    }

    #[test]
    fn summary_key_folds_case_and_whitespace() {
        assert_eq!(summary_key("  Login   With\tValid Email "), "login with valid email");
    }

    #[test]
    fn step_signature_strips_numbering_and_punctuation() {
        let sig = StepSignature::new("1. Open the Login page.\n2) Enter e-mail!\nStep 3: Submit", &config());
        assert_eq!(sig.text(), "open the login page enter e mail submit");
    }

    #[test]
    fn step_signature_strips_inline_numbering() {
        let sig = StepSignature::new("1. Open page 2. Click save", &config());
        assert_eq!(sig.text(), "open page click save");
    }

    #[test]
    fn identical_steps_are_fully_similar() {
        let a = StepSignature::new("Open settings and update profile", &config());
        let b = StepSignature::new("1. open settings, and update profile.", &config());
        assert!((a.similarity(&b, &config()) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn action_verb_bonus_applies_once_per_shared_verb() {
        // tokens: {create, user, account} vs {create, user, profile} -> 2/4 = 0.5
        let a = StepSignature::new("create user account", &config());
        let b = StepSignature::new("create user profile", &config());
        let score = a.similarity(&b, &config());
        assert!((score - 0.6).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn empty_steps_never_similar() {
        let a = StepSignature::new("", &config());
        let b = StepSignature::new("", &config());
        assert_eq!(a.similarity(&b, &config()), 0.0);
    }

    #[test]
    fn purpose_signature_takes_first_five_qualifying_words() {
        let sig = PurposeSignature::new("Verify login with valid email and password", &config());
        assert_eq!(sig.words(), &["verify", "login", "valid", "email", "password"]);

        let sig = PurposeSignature::new("Add a new tag to the post", &config());
        assert_eq!(sig.words(), &["add"]);
    }

    #[test]
    fn purpose_overlap_is_shared_over_union() {
        let a = PurposeSignature::new("Verify login with valid email and password", &config());
        let b = PurposeSignature::new("Check login using correct email and password", &config());
        // shared {login, email}, union of 8 words
        assert!((a.overlap(&b) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn duplicate_of_reports_first_signal() {
        let c = config();
        let base = NormalizedRecord::new("TC_1", "Login works").with_steps("open login page");
        let same_summary = NormalizedRecord::new("TC_2", "LOGIN  works").with_steps("something else entirely");
        let reason = RecordSignature::of(&same_summary, &c).duplicate_of(&RecordSignature::of(&base, &c), &c);
        assert_eq!(reason, Some(RejectReason::ExactSummary));
    }
}
