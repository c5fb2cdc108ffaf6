use data_loader::{CsvFormat, InteractionMatrix};
use std::path::Path;
use std::time::Instant;

fn main() {
    let path = Path::new("data/user_book_interactions.csv");

    println!("Loading interactions from {}...\n", path.display());

    let start = Instant::now();
    let matrix = InteractionMatrix::load(path, &CsvFormat::default())
        .expect("Failed to load interactions");
    let elapsed = start.elapsed();

    let (users, items) = matrix.shape();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users: {}", users);
    println!("Items: {}", items);
    println!("Observed ratings: {}", matrix.observed());
    println!("Density: {:.4}", matrix.density());
    println!("\nPerformance: {:.0} ratings/second",
             matrix.observed() as f64 / elapsed.as_secs_f64());
}
