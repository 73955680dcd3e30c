//! TCG Core - record model for AI-generated test cases
//!
//! Shared vocabulary for every stage of the generation pipeline:
//! - Untrusted candidate records parsed from model output
//! - Normalized records ready for persistence
//! - Tagged extraction results (real vs synthetic)
//! - Pipeline configuration and tuning constants
//! - Error taxonomy for the AI collaborator
//!
//! # Example
//!
//! ```rust
//! use tcg_core::{CandidateRecord, RecordKind};
//!
//! let candidate = CandidateRecord::from_json(&serde_json::json!({
//!     "id": "TC_1",
//!     "summary": "Login with valid credentials",
//!     "steps": ["Open login page", "Submit the form"],
//! }))
//! .unwrap();
//!
//! assert_eq!(candidate.first_text(&["summary"]), Some("Login with valid credentials".to_string()));
//! assert_eq!(RecordKind::TestCase.id_prefix(), "TC");
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod error;
pub mod record;

// Re-exports for convenience
pub use config::{
    GeminiConfig, PipelineConfig, QualityConfig, RecordDefaults, RetryPolicy, SimilarityConfig,
};
pub use error::{ConfigError, GenerationError, InvokeError, PipelineError, PipelineResult};
pub use record::{
    CandidateRecord, Extraction, ExtractionSource, NormalizedRecord, RawField, RecordKind,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with generated records
    pub use crate::{
        CandidateRecord, Extraction, ExtractionSource, NormalizedRecord, PipelineConfig, RawField,
        RecordKind,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
