//! TCG Pipeline - AI test case generation end to end
//!
//! Wires the stages together:
//!
//! | Stage | Crate |
//! |---|---|
//! | Retrying model call | `tcg-invoker` |
//! | Extraction and normalization | `tcg-extract` |
//! | Duplicate filtering | `tcg-dedup` |
//!
//! plus caller-side helpers for prompt composition and record rearrangement.
//!
//! # Example
//!
//! ```rust
//! use tcg_core::{PipelineConfig, RecordKind};
//! use tcg_pipeline::process_response;
//!
//! let raw = r#"[{"summary": "Login works", "steps": ["Open login page"]}]"#;
//! let outcome = process_response(raw, RecordKind::TestCase, &[], &PipelineConfig::default());
//! assert!(!outcome.is_synthetic());
//! assert_eq!(outcome.records[0].id, "TC_1");
//! ```

#![warn(unreachable_pub)]

pub mod arrange;
pub mod pipeline;
pub mod prompt;

pub use arrange::{group_by_module, renumber};
pub use pipeline::{process_response, GenerationOutcome, GenerationPipeline, GenerationRequest};
pub use prompt::{PromptBuilder, DEFAULT_COUNT, MAX_EXISTING_SUMMARIES};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running generations
    pub use crate::{GenerationOutcome, GenerationPipeline, GenerationRequest, PromptBuilder};
    pub use tcg_core::prelude::*;
    pub use tcg_invoker::{GeminiClient, TextGenerator};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
