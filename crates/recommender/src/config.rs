//! Model configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it changes:
//!
//! ```json
//! { "components": 20, "scoring": "user_similarity", "exclude_rated": true }
//! ```

use crate::error::{RecommendError, Result};
use crate::scoring::ScoringMode;
use factorization::SvdAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hyperparameters and output options for [`RecommendationModel`](crate::RecommendationModel)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecommenderConfig {
    /// Number of latent components K
    pub components: usize,
    /// Seed for the randomized decomposition
    pub seed: u64,
    pub algorithm: SvdAlgorithm,
    pub power_iterations: usize,
    pub oversamples: usize,
    pub scoring: ScoringMode,
    /// Default list length when the caller does not pass one
    pub top_n: usize,
    /// Drop items the user has already rated
    pub exclude_rated: bool,
    /// Drop items scoring below this value
    pub min_score: Option<f64>,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            components: 10,
            seed: 42,
            algorithm: SvdAlgorithm::Randomized,
            power_iterations: 5,
            oversamples: 10,
            scoring: ScoringMode::Reconstruction,
            top_n: 5,
            exclude_rated: false,
            min_score: None,
        }
    }
}

impl RecommenderConfig {
    /// Read a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| RecommendError::Config {
            origin: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse_json(&text, &path.display().to_string())
    }

    /// Parse a configuration from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::parse_json(text, "<inline>")
    }

    fn parse_json(text: &str, origin: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| RecommendError::Config {
            origin: origin.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn with_components(mut self, components: usize) -> Self {
        self.components = components;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_algorithm(mut self, algorithm: SvdAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringMode) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_exclude_rated(mut self, exclude_rated: bool) -> Self {
        self.exclude_rated = exclude_rated;
        self
    }

    pub fn with_min_score(mut self, min_score: Option<f64>) -> Self {
        self.min_score = min_score;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RecommenderConfig::default();
        assert_eq!(config.components, 10);
        assert_eq!(config.seed, 42);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.algorithm, SvdAlgorithm::Randomized);
        assert_eq!(config.scoring, ScoringMode::Reconstruction);
        assert!(!config.exclude_rated);
        assert!(config.min_score.is_none());
    }

    #[test]
    fn test_partial_json() {
        let config = RecommenderConfig::from_json_str(
            r#"{ "components": 3, "algorithm": "exact", "scoring": "user_similarity" }"#,
        )
        .unwrap();

        assert_eq!(config.components, 3);
        assert_eq!(config.algorithm, SvdAlgorithm::Exact);
        assert_eq!(config.scoring, ScoringMode::UserSimilarity);
        // untouched keys keep their defaults
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = RecommenderConfig::from_json_str(r#"{ "n_components": 3 }"#).unwrap_err();
        assert!(matches!(err, RecommendError::Config { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = RecommenderConfig::from_json_file(Path::new("no/such/config.json")).unwrap_err();
        assert!(matches!(err, RecommendError::Config { ref origin, .. } if origin.contains("config.json")));
    }
}
