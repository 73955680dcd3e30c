//! TCG Extract - recovering records from model output
//!
//! The untrusted half of the pipeline:
//! - **Extractor**: raw text → candidate records (strict, repaired, manual, fallback)
//! - **Normalizer**: candidate records → fixed-shape normalized records
//!
//! # Example
//!
//! ```rust
//! use tcg_core::{ExtractionSource, RecordKind};
//! use tcg_extract::{extract_records, normalize};
//!
//! let raw = "```json\n[{\"summary\": \"Login works\", \"steps\": [\"Open\", \"Submit\"]}]\n```";
//! let extraction = extract_records(raw, RecordKind::TestCase);
//! assert_eq!(extraction.source, ExtractionSource::Strict);
//!
//! let records = normalize(&extraction.records, RecordKind::TestCase);
//! assert_eq!(records[0].id, "TC_1");
//! assert_eq!(records[0].steps, "Open\nSubmit");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod extractor;
pub mod fallback;
pub mod manual;
pub mod normalizer;
pub mod repair;

pub use extractor::{
    extract_records, ExtractionStrategy, Extractor, ManualFields, PreparedText, RepairedJson,
    StrictJson,
};
pub use fallback::{fallback_len, fallback_records, PLACEHOLDER_MARKER};
pub use normalizer::{normalize, Normalizer};
pub use repair::repair_json;
