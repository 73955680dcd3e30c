//! TCG Invoker - calling the AI collaborator
//!
//! - [`TextGenerator`]: the prompt-in, text-out seam every collaborator implements
//! - [`RetryInvoker`]: bounded exponential backoff over overload and rate-limit failures
//! - [`GeminiClient`]: `reqwest` implementation against the Gemini REST API
//!
//! ```rust,no_run
//! use tcg_core::{GeminiConfig, RetryPolicy};
//! use tcg_invoker::{GeminiClient, RetryInvoker};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::from_env(&GeminiConfig::default())?;
//! let invoker = RetryInvoker::new(client, RetryPolicy::default());
//! let text = invoker.invoke("Generate 5 test cases as a JSON array").await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod gemini;
pub mod generator;
pub mod retry;

pub use gemini::GeminiClient;
pub use generator::TextGenerator;
pub use retry::{classify, invoke_with_retry, FailureClass, RetryInvoker};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
