//! The fitted recommendation model.
//!
//! `fit` runs the expensive part once: it decomposes the interaction matrix
//! and keeps the result. Every query after that is read-only:
//! 1. Look up the user's row (unknown users are an error)
//! 2. Score every item from the user's latent row
//! 3. Rank by descending score, ties in item column order
//! 4. Run the configured filters
//! 5. Keep the first `top_n`

use crate::config::RecommenderConfig;
use crate::error::{RecommendError, Result};
use crate::filter_pipeline::FilterPipeline;
use crate::filters::{AlreadyRatedFilter, MinimumScoreFilter};
use crate::scoring::{self, ScoredItem, ScoringMode};
use crate::traits::FilterContext;
use data_loader::{CsvFormat, InteractionMatrix, ItemId};
use factorization::{TruncatedSvd, build_decomposer};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Interaction matrix plus its truncated SVD, ready to answer queries
pub struct RecommendationModel {
    matrix: InteractionMatrix,
    factors: TruncatedSvd,
    scoring: ScoringMode,
    filters: FilterPipeline,
    default_top_n: usize,
}

impl RecommendationModel {
    /// Decompose `matrix` according to `config`
    ///
    /// # Errors
    /// Fails with a factorization error if the matrix is empty or if
    /// `config.components` exceeds the smaller matrix dimension.
    #[instrument(skip_all, fields(components = config.components, algorithm = ?config.algorithm))]
    pub fn fit(matrix: InteractionMatrix, config: &RecommenderConfig) -> Result<Self> {
        let start = Instant::now();
        let decomposer = build_decomposer(
            config.algorithm,
            config.components,
            config.seed,
            config.power_iterations,
            config.oversamples,
        );

        let factors = decomposer.decompose(matrix.values())?;
        let (rows, cols) = matrix.shape();
        info!(
            "Fitted {} SVD with {} components on {}x{} matrix in {:.2?}",
            decomposer.name(),
            factors.n_components(),
            rows,
            cols,
            start.elapsed()
        );
        debug!(
            "Explained variance ratio: {:?}",
            factors.explained_variance_ratio()
        );

        let mut filters = FilterPipeline::new();
        if config.exclude_rated {
            filters = filters.add_filter(AlreadyRatedFilter);
        }
        if let Some(min_score) = config.min_score {
            filters = filters.add_filter(MinimumScoreFilter::new(min_score));
        }
        if !filters.is_empty() {
            info!("{} result filters: {:?}", filters.len(), filters.names());
        }

        Ok(Self {
            matrix,
            factors,
            scoring: config.scoring,
            filters,
            default_top_n: config.top_n,
        })
    }

    /// Load an interactions file and fit a model on it
    pub fn load_and_fit(path: &Path, format: &CsvFormat, config: &RecommenderConfig) -> Result<Self> {
        let matrix = InteractionMatrix::load(path, format)?;
        Self::fit(matrix, config)
    }

    /// Replace the result filters (builder pattern)
    pub fn with_filters(mut self, filters: FilterPipeline) -> Self {
        self.filters = filters;
        self
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    pub fn factors(&self) -> &TruncatedSvd {
        &self.factors
    }

    pub fn scoring(&self) -> ScoringMode {
        self.scoring
    }

    /// The configured default list length
    pub fn default_top_n(&self) -> usize {
        self.default_top_n
    }

    fn user_row(&self, user_id: &str) -> Result<usize> {
        self.matrix
            .user_index(user_id)
            .ok_or_else(|| RecommendError::UnknownUser(user_id.to_string()))
    }

    /// The user's latent factor vector (`U_k Σ_k` row)
    pub fn latent_factors(&self, user_id: &str) -> Result<Vec<f64>> {
        let row = self.user_row(user_id)?;
        Ok(self.factors.transformed().row(row).iter().copied().collect())
    }

    /// Predicted score of every item for the user, in item column order
    pub fn predict_scores(&self, user_id: &str) -> Result<Vec<ScoredItem>> {
        let row = self.user_row(user_id)?;
        self.scored_items(row)
    }

    fn scored_items(&self, row: usize) -> Result<Vec<ScoredItem>> {
        let items = self.matrix.items();
        let scores = scoring::score_row(&self.factors, row, self.scoring, items.len())?;
        Ok(items
            .iter()
            .zip(scores)
            .enumerate()
            .map(|(column, (item_id, score))| ScoredItem::new(item_id.as_str(), column, score))
            .collect())
    }

    /// Top `top_n` items with their scores, best first
    #[instrument(skip(self))]
    pub fn recommend_scored(&self, user_id: &str, top_n: usize) -> Result<Vec<ScoredItem>> {
        let row = self.user_row(user_id)?;

        let mut ranked = self.scored_items(row)?;
        scoring::rank(&mut ranked);

        let context = FilterContext {
            user_id,
            row,
            matrix: &self.matrix,
        };
        let mut kept = self.filters.apply(ranked, &context)?;
        kept.truncate(top_n);

        debug!("Recommended {} items for user {}", kept.len(), user_id);
        Ok(kept)
    }

    /// Top `top_n` item ids, best first
    pub fn recommend(&self, user_id: &str, top_n: usize) -> Result<Vec<ItemId>> {
        Ok(self
            .recommend_scored(user_id, top_n)?
            .into_iter()
            .map(|item| item.item_id)
            .collect())
    }

    /// [`recommend`](Self::recommend) with the configured default list length
    pub fn recommend_default(&self, user_id: &str) -> Result<Vec<ItemId>> {
        self.recommend(user_id, self.default_top_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Interaction;
    use factorization::{FactorizeError, SvdAlgorithm};

    fn example_matrix() -> InteractionMatrix {
        InteractionMatrix::from_interactions(&[
            Interaction::new("u1", "b1", 5.0),
            Interaction::new("u1", "b2", 1.0),
            Interaction::new("u2", "b1", 4.0),
            Interaction::new("u2", "b3", 5.0),
        ])
    }

    #[test]
    fn test_fit_rejects_too_many_components() {
        // Default K = 10 does not fit a 2x3 matrix
        let err = RecommendationModel::fit(example_matrix(), &RecommenderConfig::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            RecommendError::Factorize(FactorizeError::TooManyComponents { requested: 10, max: 2 })
        ));
    }

    #[test]
    fn test_fit_rejects_empty_matrix() {
        let err = RecommendationModel::fit(InteractionMatrix::new(), &RecommenderConfig::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            RecommendError::Factorize(FactorizeError::EmptyMatrix { .. })
        ));
    }

    #[test]
    fn test_full_rank_reconstruction_ranks_known_ratings() {
        let config = RecommenderConfig::default().with_components(2);
        let model = RecommendationModel::fit(example_matrix(), &config).unwrap();

        assert_eq!(model.recommend("u1", 2).unwrap(), vec!["b1", "b2"]);
        assert_eq!(model.recommend("u2", 2).unwrap(), vec!["b3", "b1"]);
    }

    #[test]
    fn test_unknown_user() {
        let config = RecommenderConfig::default().with_components(1);
        let model = RecommendationModel::fit(example_matrix(), &config).unwrap();

        let err = model.recommend("u9", 5).unwrap_err();
        assert!(matches!(err, RecommendError::UnknownUser(ref id) if id == "u9"));
        assert!(model.latent_factors("u9").is_err());
    }

    #[test]
    fn test_user_similarity_requires_square_matrix() {
        let config = RecommenderConfig::default()
            .with_components(1)
            .with_scoring(ScoringMode::UserSimilarity);
        let model = RecommendationModel::fit(example_matrix(), &config).unwrap();

        let err = model.recommend("u1", 2).unwrap_err();
        assert!(matches!(
            err,
            RecommendError::ScoreLabelMismatch { scores: 2, labels: 3 }
        ));
    }

    #[test]
    fn test_exclude_rated() {
        let config = RecommenderConfig::default()
            .with_components(2)
            .with_algorithm(SvdAlgorithm::Exact)
            .with_exclude_rated(true);
        let model = RecommendationModel::fit(example_matrix(), &config).unwrap();

        assert_eq!(model.recommend("u1", 5).unwrap(), vec!["b3"]);
        assert_eq!(model.recommend("u2", 5).unwrap(), vec!["b2"]);
    }

    #[test]
    fn test_rank_one_scores_reproduce_ratings() {
        // every user rated the same books the same way
        let ratings = [("b1", 5.0), ("b2", 3.0), ("b3", 1.0), ("b4", 4.0)];
        let interactions: Vec<Interaction> = (0..12)
            .flat_map(|u| {
                ratings
                    .iter()
                    .map(move |(item, r)| Interaction::new(format!("u{}", u), *item, *r))
            })
            .collect();
        let config = RecommenderConfig::default().with_components(1);
        let model =
            RecommendationModel::fit(InteractionMatrix::from_interactions(&interactions), &config)
                .unwrap();

        let scores = model.predict_scores("u3").unwrap();
        for (item, (_, rating)) in scores.iter().zip(ratings) {
            assert!((item.score - rating).abs() < 1e-8, "{} scored {}", item.item_id, item.score);
        }
        assert_eq!(model.recommend("u3", 4).unwrap(), vec!["b1", "b4", "b2", "b3"]);
    }

    #[test]
    fn test_latent_factors_length() {
        let config = RecommenderConfig::default().with_components(2);
        let model = RecommendationModel::fit(example_matrix(), &config).unwrap();

        assert_eq!(model.latent_factors("u1").unwrap().len(), 2);
        assert_eq!(model.predict_scores("u1").unwrap().len(), 3);
    }
}
