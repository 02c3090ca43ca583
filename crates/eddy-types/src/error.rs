//! Error types for the eddy solver.
//!
//! All crates return `EddyResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for the eddy solver.
#[derive(Debug, Error)]
pub enum EddyError {
    /// Grid resolution or field layout is malformed.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Boundary tag is outside `{0, 1, 2}`.
    #[error("Invalid boundary type tag: {0}")]
    InvalidBoundary(u32),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Device allocation, dispatch, or synchronization failed.
    #[error("GPU error: {0}")]
    Gpu(String),

    /// A simulation invariant was violated (e.g. non-finite field values).
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Convenience alias for `Result<T, EddyError>`.
pub type EddyResult<T> = Result<T, EddyError>;
