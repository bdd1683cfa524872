//! Judge error types.

use thiserror::Error;

/// Errors from a scoring engine call.
///
/// None of these escape the evaluation pipeline; every variant is recovered
/// by the deterministic fallback.
#[derive(Debug, Error)]
pub enum EngineError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Engine API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the engine.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The engine returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The reply could not be turned into a verdict.
    #[error("malformed verdict: {0}")]
    Malformed(String),

    /// The engine did not answer within the allotted time.
    #[error("scoring engine timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// No engine is configured or reachable.
    #[error("scoring engine unavailable: {0}")]
    Unavailable(String),
}

/// Errors from resolving a file or image reference.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content not found: {0}")]
    NotFound(String),

    /// The reference points outside the content root.
    #[error("content reference rejected: {0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
