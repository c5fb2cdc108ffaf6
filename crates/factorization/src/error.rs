//! Error types for the factorization crate.

use thiserror::Error;

/// Errors raised while decomposing an interaction matrix
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactorizeError {
    /// The matrix has no rows or no columns
    #[error("Cannot factorize an empty {rows}x{cols} matrix")]
    EmptyMatrix { rows: usize, cols: usize },

    /// Zero components were requested
    #[error("Number of components must be at least 1")]
    InvalidComponents,

    /// More components than the smaller matrix dimension
    #[error("Requested {requested} components but the matrix supports at most {max}")]
    TooManyComponents { requested: usize, max: usize },

    /// The numerical SVD routine failed
    #[error("Singular value decomposition failed: {0}")]
    Decomposition(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, FactorizeError>;
