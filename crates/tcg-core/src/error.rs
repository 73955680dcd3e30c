//! Error types for TCG
//!
//! Provides error handling for:
//! - AI collaborator failures (one call)
//! - Retry outcomes (transient exhaustion vs permanent failure)
//! - Configuration loading
//!
//! Malformed or low-quality model output is never an error; the extractor and the
//! duplicate filter resolve it internally.

use std::path::PathBuf;
use std::time::Duration;

/// Failure of a single text-generation call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Service answered with a non-success HTTP status
    #[error("service returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Request never completed (connect, timeout, TLS)
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("malformed service response: {0}")]
    Decode(String),

    /// Response carried no candidate text
    #[error("service returned no text")]
    EmptyResponse,

    /// API key environment variable unset
    #[error("missing API key: environment variable {0} is not set")]
    MissingApiKey(String),

    /// Collaborator-specific failure
    #[error("{0}")]
    Other(String),
}

impl GenerationError {
    /// Create status error
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }
}

/// Outcome of a failed retrying invocation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
    /// Every attempt hit an overload/rate-limit failure
    #[error("service unavailable after {attempts} attempts: {source}")]
    Transient {
        /// Attempts performed
        attempts: u32,
        /// Suggested wait before the caller tries again
        retry_after_ms: u64,
        /// Last failure
        #[source]
        source: GenerationError,
    },

    /// Failure that retrying cannot fix
    #[error("generation failed on attempt {attempt}: {source}")]
    Permanent {
        /// Attempt that failed
        attempt: u32,
        /// The failure
        #[source]
        source: GenerationError,
    },
}

impl InvokeError {
    /// Whether the caller should try again later
    #[inline]
    #[must_use]
    pub fn is_retry_later(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Retry-after hint for transient failures
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Transient { retry_after_ms, .. } => Some(Duration::from_millis(*retry_after_ms)),
            Self::Permanent { .. } => None,
        }
    }

    /// Number of attempts made before giving up
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Transient { attempts, .. } => *attempts,
            Self::Permanent { attempt, .. } => *attempt,
        }
    }

    /// The underlying collaborator failure
    #[must_use]
    pub fn generation_error(&self) -> &GenerationError {
        match self {
            Self::Transient { source, .. } | Self::Permanent { source, .. } => source,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML syntax or schema error
    #[error("config parse error: {0}")]
    Parse(String),

    /// IO error reading config file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Value out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Combined pipeline error
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Invoke(#[from] InvokeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PipelineError {
    /// Whether the caller should try again later
    #[inline]
    #[must_use]
    pub fn is_retry_later(&self) -> bool {
        matches!(self, Self::Invoke(e) if e.is_retry_later())
    }
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
