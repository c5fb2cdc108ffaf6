//! # Recommender Crate
//!
//! Collaborative filtering on top of a truncated SVD of the user × item
//! interaction matrix.
//!
//! ## Pipeline
//! 1. Load ratings and pivot them into a dense matrix (`data-loader`)
//! 2. Fit: decompose the matrix once (`factorization`)
//! 3. Score: one predicted score per item from the user's latent row
//! 4. Rank by descending score, filter, and keep the top N
//!
//! ## Example Usage
//! ```ignore
//! use recommender::{RecommendationModel, RecommenderConfig};
//! use data_loader::CsvFormat;
//! use std::path::Path;
//!
//! let model = RecommendationModel::load_and_fit(
//!     Path::new("data/user_book_interactions.csv"),
//!     &CsvFormat::default(),
//!     &RecommenderConfig::default(),
//! )?;
//!
//! let books = model.recommend("1", 5)?;
//! ```

pub mod error;
pub mod config;
pub mod scoring;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod model;

// Re-export main types
pub use error::{RecommendError, Result};
pub use config::RecommenderConfig;
pub use scoring::{ScoredItem, ScoringMode};
pub use traits::{Filter, FilterContext};
pub use filter_pipeline::FilterPipeline;
pub use model::RecommendationModel;
pub use factorization::SvdAlgorithm;
