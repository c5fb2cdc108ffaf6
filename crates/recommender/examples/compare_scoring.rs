//! Example: Compare algorithms and scoring modes for one user
//!
//! Run with: cargo run --package recommender --example compare_scoring
//!
//! This example shows how to:
//! 1. Load the interactions file and fit a model
//! 2. Fit the same data with the exact algorithm
//! 3. Recommend with reconstruction scoring
//! 4. Try user-similarity scoring, which only works on square matrices

use data_loader::{CsvFormat, InteractionMatrix};
use recommender::{RecommendationModel, RecommenderConfig, ScoringMode, SvdAlgorithm};
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    println!("=== BookRecs Scoring Comparison ===\n");

    let path = Path::new("data/user_book_interactions.csv");
    let matrix = InteractionMatrix::load(path, &CsvFormat::default())?;
    let (users, items) = matrix.shape();
    println!("Loaded {} users x {} items\n", users, items);

    let user_id = "1";
    let top_n = 5;
    let components = 10.min(users).min(items);
    let config = RecommenderConfig::default().with_components(components);

    for algorithm in [SvdAlgorithm::Randomized, SvdAlgorithm::Exact] {
        let start = Instant::now();
        let model = RecommendationModel::fit(matrix.clone(), &config.clone().with_algorithm(algorithm))?;
        let fit_time = start.elapsed();

        println!("{:?} SVD (fitted in {:?}):", algorithm, fit_time);
        for (rank, item) in model.recommend_scored(user_id, top_n)?.iter().enumerate() {
            println!("  {}. {} (score: {:.3})", rank + 1, item.item_id, item.score);
        }
        println!();
    }

    println!("User-similarity scoring:");
    let model = RecommendationModel::fit(matrix, &config.with_scoring(ScoringMode::UserSimilarity))?;
    match model.recommend(user_id, top_n) {
        Ok(books) => println!("  {:?}", books),
        Err(e) => println!("  unavailable: {}", e),
    }

    Ok(())
}
