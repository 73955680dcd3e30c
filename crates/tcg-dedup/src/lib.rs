//! TCG Dedup - duplicate and similarity filtering
//!
//! Generative models reproduce near-identical content across calls, so exact-match
//! de-duplication alone misses most repeats. This crate combines three signals:
//!
//! | Signal | Comparison | Default threshold |
//! |---|---|---|
//! | summary | exact after case/whitespace folding | - |
//! | step signature | token Jaccard + action-verb bonus | 0.75 |
//! | purpose signature | word overlap | 0.70 |
//!
//! Filtering is cumulative: each survivor is compared against the caller's existing
//! records and every earlier survivor of the batch. State lives in a [`FilterState`]
//! created per call.
//!
//! # Example
//!
//! ```rust
//! use tcg_core::{NormalizedRecord, PipelineConfig};
//! use tcg_dedup::filter_duplicates;
//!
//! let existing = vec![NormalizedRecord::new("TC_1", "Reset password via email")];
//! let new = vec![
//!     NormalizedRecord::new("TC_2", "reset password via email"),
//!     NormalizedRecord::new("TC_3", "Change display name"),
//! ];
//!
//! let outcome = filter_duplicates(new, &existing, &PipelineConfig::default());
//! assert_eq!(outcome.kept.len(), 1);
//! assert_eq!(outcome.kept[0].id, "TC_3");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod analysis;
pub mod filter;
pub mod report;
pub mod signature;
pub mod state;

pub use analysis::{analyze, CorpusAnalysis, NearDuplicate};
pub use filter::{filter_duplicates, DuplicateFilter, FilterOutcome, Rejection};
pub use report::{FilterReport, QualitySnapshot};
pub use signature::{summary_key, PurposeSignature, RecordSignature, RejectReason, StepSignature};
pub use state::FilterState;
