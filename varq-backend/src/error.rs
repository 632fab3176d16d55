//! Error types for backend operations

use thiserror::Error;

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors caused by a quantum computing backend
///
/// Every failure at or below the execution boundary surfaces as a
/// `BackendError` and propagates to the caller of
/// [`SamplingJob::result`](crate::SamplingJob::result) undecorated: this
/// layer performs no retry and no fallback.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The backend rejected the job at submission time
    #[error("Job submission failed: {0}")]
    SubmissionFailed(String),

    /// The job was accepted but failed to produce a result
    #[error("Job execution failed: {0}")]
    ExecutionFailed(String),

    /// The backend cannot be reached
    #[error("Backend not available: {0}")]
    Unavailable(String),

    /// The backend returned a result this layer cannot interpret
    #[error("Malformed sampling result: {0}")]
    MalformedResult(String),

    /// A sampling measurement was requested with zero shots
    #[error("Invalid shot count {0}: must be positive")]
    InvalidShotCount(usize),
}
