use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{CsvFormat, UserId};
use rand::Rng;
use recommender::{RecommendationModel, RecommenderConfig, ScoredItem, ScoringMode, SvdAlgorithm};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// BookRecs - collaborative filtering with truncated SVD
#[derive(Parser)]
#[command(name = "book-recs")]
#[command(about = "Book recommendations from a truncated SVD of user ratings", long_about = None)]
struct Cli {
    /// Path to the user-item interactions file (delimited text with a header row)
    #[arg(short, long, default_value = "data/user_book_interactions.csv")]
    data: PathBuf,

    /// JSON file with model settings; the flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Field delimiter of the interactions file
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Header name of the user id column
    #[arg(long, default_value = "user_id")]
    user_column: String,

    /// Header name of the item id column
    #[arg(long, default_value = "book_id")]
    item_column: String,

    /// Header name of the rating column
    #[arg(long, default_value = "rating")]
    rating_column: String,

    /// Number of latent components K
    #[arg(short = 'k', long)]
    components: Option<usize>,

    /// Seed for the randomized decomposition
    #[arg(long)]
    seed: Option<u64>,

    /// Decomposition algorithm
    #[arg(long, value_enum)]
    algorithm: Option<AlgorithmArg>,

    /// How item scores are computed from the latent factors
    #[arg(long, value_enum)]
    scoring: Option<ScoringArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get book recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long, default_value = "1")]
        user_id: UserId,

        /// Number of recommendations to return (defaults to the configured top_n)
        #[arg(long)]
        top_n: Option<usize>,

        /// Print the predicted score next to each item
        #[arg(long)]
        scores: bool,

        /// Skip items the user has already rated
        #[arg(long)]
        exclude_rated: bool,

        /// Skip items scoring below this value
        #[arg(long)]
        min_score: Option<f64>,
    },

    /// Show a user's ratings and latent factors
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Show matrix and decomposition statistics
    Stats,

    /// Time repeated recommendation requests
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Randomized,
    Exact,
}

impl From<AlgorithmArg> for SvdAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Randomized => SvdAlgorithm::Randomized,
            AlgorithmArg::Exact => SvdAlgorithm::Exact,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ScoringArg {
    Reconstruction,
    UserSimilarity,
}

impl From<ScoringArg> for ScoringMode {
    fn from(arg: ScoringArg) -> Self {
        match arg {
            ScoringArg::Reconstruction => ScoringMode::Reconstruction,
            ScoringArg::UserSimilarity => ScoringMode::UserSimilarity,
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let format = CsvFormat::default()
        .with_delimiter(cli.delimiter)
        .with_columns(&cli.user_column, &cli.item_column, &cli.rating_column);

    // Load and fit once; every command reads the same model
    println!("Loading interactions from {}...", cli.data.display());
    let start = Instant::now();
    let model = RecommendationModel::load_and_fit(&cli.data, &format, &config)
        .context("Failed to build recommendation model")?;
    println!("{} Fitted model in {:?}", "✓".green(), start.elapsed());

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            user_id,
            top_n,
            scores,
            ..
        } => handle_recommend(&model, &user_id, top_n, scores)?,
        Commands::User { user_id } => handle_user(&model, &user_id)?,
        Commands::Stats => handle_stats(&model),
        Commands::Benchmark { requests } => handle_benchmark(&model, requests)?,
    }

    Ok(())
}

/// Merge the config file (if any) with command-line overrides
fn build_config(cli: &Cli) -> Result<RecommenderConfig> {
    let mut config = match &cli.config {
        Some(path) => RecommenderConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => RecommenderConfig::default(),
    };

    if let Some(components) = cli.components {
        config.components = components;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(algorithm) = cli.algorithm {
        config.algorithm = algorithm.into();
    }
    if let Some(scoring) = cli.scoring {
        config.scoring = scoring.into();
    }
    if let Commands::Recommend {
        exclude_rated,
        min_score,
        ..
    } = &cli.command
    {
        if *exclude_rated {
            config.exclude_rated = true;
        }
        if min_score.is_some() {
            config.min_score = *min_score;
        }
    }

    tracing::debug!("Effective config: {:?}", config);
    Ok(config)
}

/// Handle the 'recommend' command
fn handle_recommend(
    model: &RecommendationModel,
    user_id: &str,
    top_n: Option<usize>,
    show_scores: bool,
) -> Result<()> {
    let top_n = top_n.unwrap_or(model.default_top_n());
    let recommendations = model
        .recommend_scored(user_id, top_n)
        .with_context(|| format!("Failed to recommend for user {}", user_id))?;

    print_recommendations(user_id, &recommendations, show_scores);
    Ok(())
}

/// Handle the 'user' command
fn handle_user(model: &RecommendationModel, user_id: &str) -> Result<()> {
    let factors = model.latent_factors(user_id)?;
    let rated = model.matrix().rated_items(user_id);

    println!("{}", format!("User ID: {}", user_id).bold().blue());

    let avg_rating = if rated.is_empty() {
        0.0
    } else {
        rated.iter().map(|(_, r)| r).sum::<f64>() / rated.len() as f64
    };
    println!("{}Number of ratings: {}", "• ".cyan(), rated.len());
    println!("{}Average rating: {:.2}", "• ".cyan(), avg_rating);

    println!("Ratings:");
    for (item_id, rating) in &rated {
        println!("  - {} (Rating: {})", item_id, rating);
    }

    let factors_str = factors
        .iter()
        .map(|f| format!("{:.3}", f))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Latent factors: [{}]", factors_str);
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(model: &RecommendationModel) {
    let matrix = model.matrix();
    let factors = model.factors();
    let (users, items) = matrix.shape();

    println!("{}", "Interaction matrix:".bold().blue());
    println!("{}Users: {}", "• ".green(), users);
    println!("{}Items: {}", "• ".green(), items);
    println!("{}Observed ratings: {}", "• ".green(), matrix.observed());
    println!("{}Density: {:.4}", "• ".green(), matrix.density());

    println!("{}", "Decomposition:".bold().blue());
    println!("{}Components: {}", "• ".green(), factors.n_components());
    println!("{}Scoring: {:?}", "• ".green(), model.scoring());
    for (i, (sigma, ratio)) in factors
        .singular_values()
        .iter()
        .zip(factors.explained_variance_ratio())
        .enumerate()
    {
        println!(
            "  {:>3}. singular value {:>10.4}  explained variance {:>6.2}%",
            i + 1,
            sigma,
            ratio * 100.0
        );
    }
    let total: f64 = factors.explained_variance_ratio().iter().sum();
    println!("Total explained variance: {:.2}%", total * 100.0);
}

/// Handle the 'benchmark' command
fn handle_benchmark(model: &RecommendationModel, requests: usize) -> Result<()> {
    if requests == 0 {
        bail!("Benchmark needs at least one request");
    }
    let users = model.matrix().users();
    let mut rng = rand::rng();

    // Pick random known users and time each request
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for _ in 0..requests {
        let user = &users[rng.random_range(0..users.len())];
        let start = Instant::now();
        model.recommend_default(user)?;
        timings.push(start.elapsed());
    }

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("Benchmark results:");
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(user_id: &str, recommendations: &[ScoredItem], show_scores: bool) {
    println!(
        "{}",
        format!("Recommendations for user {}:", user_id).bold().blue()
    );
    if recommendations.is_empty() {
        println!("  (none)");
    }
    for (rank, item) in recommendations.iter().enumerate() {
        if show_scores {
            println!(
                "{}. {} - Score: {:.4}",
                (rank + 1).to_string().green(),
                item.item_id,
                item.score
            );
        } else {
            println!("{}. {}", (rank + 1).to_string().green(), item.item_id);
        }
    }
}
