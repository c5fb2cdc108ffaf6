//! Filter implementations for ranked recommendations.

pub mod already_rated;
pub mod minimum_score;

// Re-export for convenience
pub use already_rated::AlreadyRatedFilter;
pub use minimum_score::MinimumScoreFilter;
