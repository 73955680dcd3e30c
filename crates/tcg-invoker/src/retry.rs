//! Retry invoker
//!
//! Wraps a [`TextGenerator`] with bounded exponential backoff. Failures whose message
//! carries one of the policy's markers (overload, rate limiting) are retried; anything
//! else is returned after the first attempt.

use crate::generator::TextGenerator;
use rand::Rng;
use std::time::Duration;
use tcg_core::{GenerationError, InvokeError, RetryPolicy};
use tracing::{debug, error, info, warn};

/// How a single failure is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Overload or rate limiting; worth another attempt
    Retryable,
    /// Retrying cannot help
    NonRetryable,
}

/// Classify `error` by the policy's markers, matched case-insensitively on its display text
#[must_use]
pub fn classify(error: &GenerationError, policy: &RetryPolicy) -> FailureClass {
    if policy.is_retryable_message(&error.to_string()) {
        FailureClass::Retryable
    } else {
        FailureClass::NonRetryable
    }
}

/// Invokes a generator under a [`RetryPolicy`]
#[derive(Debug, Clone)]
pub struct RetryInvoker<G> {
    generator: G,
    policy: RetryPolicy,
}

impl<G: TextGenerator> RetryInvoker<G> {
    /// Create invoker
    #[must_use]
    pub fn new(generator: G, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    /// Wrapped generator
    #[inline]
    #[must_use]
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Active policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send `prompt`, retrying transient failures
    ///
    /// Attempt `n` that fails retryably is followed by a wait of
    /// `base_delay_ms * 2^(n-1)` plus up to `max_jitter_ms` of random jitter, unless it
    /// was the last attempt. A `max_attempts` of zero still performs one attempt.
    ///
    /// # Errors
    ///
    /// [`InvokeError::Transient`] when every attempt failed retryably, carrying the delay
    /// the next attempt would have used; [`InvokeError::Permanent`] on the first
    /// non-retryable failure.
    pub async fn invoke(&self, prompt: &str) -> Result<String, InvokeError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            metrics::counter!("tcg_invoke_attempts_total").increment(1);
            debug!(attempt, max_attempts, "Invoking text generator");

            let failure = match self.generator.generate(prompt).await {
                Ok(text) => {
                    if attempt > 1 {
                        info!(attempt, "Text generator succeeded after retry");
                    }
                    return Ok(text);
                }
                Err(failure) => failure,
            };

            if classify(&failure, &self.policy) == FailureClass::NonRetryable {
                error!(attempt, error = %failure, "Text generator failed permanently");
                return Err(InvokeError::Permanent {
                    attempt,
                    source: failure,
                });
            }

            let backoff_ms = self.policy.backoff_ms(attempt);
            if attempt >= max_attempts {
                error!(
                    attempts = attempt,
                    error = %failure,
                    "Text generator still unavailable, giving up"
                );
                return Err(InvokeError::Transient {
                    attempts: attempt,
                    retry_after_ms: backoff_ms,
                    source: failure,
                });
            }

            let delay_ms = backoff_ms.saturating_add(jitter_ms(self.policy.max_jitter_ms));
            warn!(
                attempt,
                max_attempts,
                delay_ms,
                error = %failure,
                "Text generator unavailable, retrying"
            );
            metrics::counter!("tcg_invoke_retries_total").increment(1);
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}

/// Invoke `generator` under an ad-hoc policy with default markers and jitter
///
/// # Errors
///
/// See [`RetryInvoker::invoke`].
pub async fn invoke_with_retry<G: TextGenerator + ?Sized>(
    generator: &G,
    prompt: &str,
    max_attempts: u32,
    base_delay_ms: u64,
) -> Result<String, InvokeError> {
    RetryInvoker::new(generator, RetryPolicy::new(max_attempts, base_delay_ms))
        .invoke(prompt)
        .await
}

fn jitter_ms(max_jitter_ms: u64) -> u64 {
    if max_jitter_ms == 0 {
        0
    } else {
        rand::rng().random_range(0..=max_jitter_ms)
    }
}
