//! Error types for the Weft simulation core.
//!
//! All crates return `WeftResult<T>` from fallible operations. Every failure
//! here is fatal for the current run: there is no retry policy anywhere in
//! the core, and the only resilience mechanism is checkpoint/resume by
//! re-invoking the driver.
//!
//! Dimension mismatches between a system matrix and its right-hand side are
//! caller bugs, not runtime conditions — those are asserted, not returned.

use thiserror::Error;

/// Unified error type for the Weft simulation core.
#[derive(Debug, Error)]
pub enum WeftError {
    /// Sparse Cholesky factorization failed (matrix not positive definite,
    /// or structurally invalid).
    #[error("Factorization failed: {0}")]
    Factorization(String),

    /// A dense decomposition (eigen, SVD) did not converge.
    /// Partial results are not meaningful and are never exposed.
    #[error("Decomposition did not converge: {0}")]
    Decomposition(String),

    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Scene configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O operation failed (checkpoint, mesh export, timing log).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure (checkpoint or scene file).
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, WeftError>`.
pub type WeftResult<T> = Result<T, WeftError>;
