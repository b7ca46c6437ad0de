//! Error types for imfilter-filter

use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] imfilter_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// An internal guarantee of the filter did not hold
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// The worker thread pool could not be created
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
