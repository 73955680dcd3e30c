//! Pipeline configuration
//!
//! Every tuning constant the pipeline uses lives here: retry budget, similarity
//! thresholds, keyword vocabularies, quality warning levels and record defaults.
//! Configuration is loaded from TOML; missing keys fall back to [`Default`].

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Retry behavior around the AI call
    pub retry: RetryPolicy,
    /// Duplicate filter thresholds and vocabularies
    pub similarity: SimilarityConfig,
    /// Advisory quality warning levels
    pub quality: QualityConfig,
    /// Values substituted for missing record fields
    pub defaults: RecordDefaults,
    /// Gemini collaborator settings
    pub gemini: GeminiConfig,
}

impl PipelineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// With retry policy
    #[inline]
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// With similarity configuration
    #[inline]
    #[must_use]
    pub fn with_similarity(mut self, similarity: SimilarityConfig) -> Self {
        self.similarity = similarity;
        self
    }

    /// With quality configuration
    #[inline]
    #[must_use]
    pub fn with_quality(mut self, quality: QualityConfig) -> Self {
        self.quality = quality;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.max_attempts must be at least 1".into()));
        }
        let ratios = [
            ("similarity.step_threshold", self.similarity.step_threshold),
            ("similarity.purpose_threshold", self.similarity.purpose_threshold),
            ("similarity.action_verb_bonus", self.similarity.action_verb_bonus),
            ("quality.min_survival_ratio", self.quality.min_survival_ratio),
            ("quality.max_category_share", self.quality.max_category_share),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{name} must be within [0, 1], got {value}")));
            }
        }
        if self.similarity.purpose_signature_len == 0 {
            return Err(ConfigError::Invalid(
                "similarity.purpose_signature_len must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Bounded exponential-backoff retry policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Delay before the first retry, doubled per subsequent retry
    pub base_delay_ms: u64,
    /// Upper bound of the uniform random jitter added to each delay
    pub max_jitter_ms: u64,
    /// Case-insensitive substrings marking an error as transient
    pub retryable_markers: Vec<String>,
}

impl RetryPolicy {
    /// Policy with the given attempt budget and base delay, other fields default
    #[must_use]
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay_ms,
            ..Self::default()
        }
    }

    /// With jitter bound
    #[inline]
    #[must_use]
    pub fn with_max_jitter_ms(mut self, max_jitter_ms: u64) -> Self {
        self.max_jitter_ms = max_jitter_ms;
        self
    }

    /// Whether `message` carries one of the transient markers
    #[must_use]
    pub fn is_retryable_message(&self, message: &str) -> bool {
        let lowered = message.to_lowercase();
        self.retryable_markers
            .iter()
            .any(|marker| lowered.contains(&marker.to_lowercase()))
    }

    /// Deterministic part of the delay after failed attempt `attempt` (1-based)
    ///
    /// `base_delay_ms * 2^(attempt-1)`, saturating.
    #[must_use]
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let exponent = attempt.saturating_sub(1).min(32);
        self.base_delay_ms.saturating_mul(1_u64 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_jitter_ms: 1000,
            retryable_markers: ["503", "overloaded", "429", "rate limit", "too many requests"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Duplicate filter thresholds and vocabularies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimilarityConfig {
    /// Step-signature similarity at or above which a record is rejected
    pub step_threshold: f64,
    /// Purpose-signature overlap at or above which a record is rejected
    pub purpose_threshold: f64,
    /// Added to step similarity per shared action verb
    pub action_verb_bonus: f64,
    /// Minimum token length (in chars) counted by step similarity
    pub min_token_len: usize,
    /// Minimum length (in chars) for a non-vocabulary purpose word
    pub purpose_word_min_len: usize,
    /// Number of words kept in a purpose signature
    pub purpose_signature_len: usize,
    /// Verbs that earn the step similarity bonus
    pub action_verbs: Vec<String>,
    /// Verbs always admitted to a purpose signature
    pub purpose_verbs: Vec<String>,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            step_threshold: 0.75,
            purpose_threshold: 0.70,
            action_verb_bonus: 0.1,
            min_token_len: 4,
            purpose_word_min_len: 5,
            purpose_signature_len: 5,
            action_verbs: words(&["login", "create", "update", "delete", "verify", "validate"]),
            purpose_verbs: words(&[
                "login", "logout", "register", "create", "add", "update", "edit", "delete",
                "remove", "verify", "validate", "search", "filter", "upload", "download", "view",
                "submit", "navigate", "check",
            ]),
        }
    }
}

/// Advisory quality warning levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    /// Warn when kept/input drops below this ratio
    pub min_survival_ratio: f64,
    /// Warn when fewer distinct submodules survive
    pub min_submodule_variety: usize,
    /// Warn when one category exceeds this share of survivors
    pub max_category_share: f64,
    /// Survivors needed before the category share is judged
    pub min_records_for_balance: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_survival_ratio: 0.70,
            min_submodule_variety: 3,
            max_category_share: 0.80,
            min_records_for_balance: 5,
        }
    }
}

/// Values substituted for missing record fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordDefaults {
    /// Default category
    pub category: String,
    /// Default environment
    pub environment: String,
    /// Default status
    pub status: String,
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            category: "Positive".to_string(),
            environment: "Test".to_string(),
            status: "Not Tested".to_string(),
        }
    }
}

/// Gemini collaborator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeminiConfig {
    /// Model name
    pub model: String,
    /// API base URL
    pub endpoint: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            request_timeout_secs: 60,
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_string()).collect()
}
