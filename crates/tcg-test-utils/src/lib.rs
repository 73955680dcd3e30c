//! Testing utilities for TCG workspace
//!
//! Shared fixtures and scripted text generators.

#![allow(missing_docs)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tcg_core::{GenerationError, NormalizedRecord};
use tcg_invoker::TextGenerator;

/// Generator replaying a fixed script of replies, one per call
///
/// Once the script runs out every further call fails with a non-retryable error.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(replies: impl IntoIterator<Item = Result<String, GenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Answers the first call with `text`
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new([Ok(text.into())])
    }

    /// Fails `times` times with an overload error, then answers `text`
    pub fn overloaded_then(times: usize, text: impl Into<String>) -> Self {
        let mut replies: Vec<Result<String, GenerationError>> =
            (0..times).map(|_| Err(overloaded())).collect();
        replies.push(Ok(text.into()));
        Self::new(replies)
    }

    pub fn failing(error: GenerationError, times: usize) -> Self {
        Self::new((0..times).map(|_| Err(error.clone())))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let next = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        next.unwrap_or_else(|| Err(GenerationError::Other("script exhausted".into())))
    }
}

const NOUNS: [&str; 10] = [
    "invoice", "avatar", "password", "export", "calendar", "payment", "comment", "shipment",
    "language", "session",
];

pub fn overloaded() -> GenerationError {
    GenerationError::status(503, "The model is overloaded. Please try again later.")
}

pub fn rate_limited() -> GenerationError {
    GenerationError::status(429, "Resource has been exhausted (e.g. check quota).")
}

/// Well-formed model reply with `n` distinct test cases inside a code fence
pub fn fenced_test_cases(n: usize) -> String {
    let records: Vec<_> = (1..=n)
        .map(|i| {
            serde_json::json!({
                "id": format!("TC_{i}"),
                "module": "Accounts",
                "submodule": format!("Area {i}"),
                "summary": distinct_summary(i),
                "steps": distinct_steps(i),
                "expectedOutcome": format!("Outcome {i} is shown"),
                "category": if i % 2 == 0 { "Negative" } else { "Positive" },
            })
        })
        .collect();
    let body = serde_json::to_string_pretty(&records).unwrap_or_default();
    format!("Here are the test cases:\n```json\n{body}\n```\n")
}

/// Summary `i` sharing no purpose words with any other index
pub fn distinct_summary(i: usize) -> String {
    format!("{} handling scenario{i}", noun(i))
}

/// Steps for index `i`; different indices stay below the step threshold
pub fn distinct_steps(i: usize) -> Vec<String> {
    let noun = noun(i);
    vec![format!("Choose {noun}"), format!("Inspect {noun} record{i}")]
}

fn noun(i: usize) -> &'static str {
    NOUNS[i.saturating_sub(1) % NOUNS.len()]
}

/// Existing record fixture
pub fn existing_record(id: &str, summary: &str) -> NormalizedRecord {
    NormalizedRecord::new(id, summary).with_module("Accounts", "Existing")
}
