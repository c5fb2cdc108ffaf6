//! Error types for the recommender crate.

use data_loader::{DataLoadError, UserId};
use factorization::FactorizeError;
use thiserror::Error;

/// Errors raised while fitting the model or answering a recommendation
#[derive(Error, Debug)]
pub enum RecommendError {
    /// The user id does not appear in the interaction data
    #[error("User {0} not found")]
    UnknownUser(UserId),

    /// User-similarity scores cannot be labelled with item ids because the
    /// matrix is not square
    #[error("Cannot label {scores} scores with {labels} item ids")]
    ScoreLabelMismatch { scores: usize, labels: usize },

    /// A configuration file could not be read or parsed
    #[error("Invalid configuration in {origin}: {reason}")]
    Config { origin: String, reason: String },

    #[error(transparent)]
    Data(#[from] DataLoadError),

    #[error(transparent)]
    Factorize(#[from] FactorizeError),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecommendError>;
