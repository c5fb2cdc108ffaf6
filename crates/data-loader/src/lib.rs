//! # Data Loader Crate
//!
//! This crate loads user-item rating records and pivots them into a dense
//! interaction matrix.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Interaction, CsvFormat, InteractionMatrix)
//! - **parser**: Parse delimited files into interaction records
//! - **matrix**: Pivot records into the dense user × item matrix
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{CsvFormat, InteractionMatrix};
//! use std::path::Path;
//!
//! let matrix = InteractionMatrix::load(
//!     Path::new("data/user_book_interactions.csv"),
//!     &CsvFormat::default(),
//! )?;
//!
//! let (users, items) = matrix.shape();
//! println!("{} users x {} items", users, items);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod matrix;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    UserId,
    ItemId,
    // Core types
    Interaction,
    CsvFormat,
    InteractionMatrix,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_creation() {
        let matrix = InteractionMatrix::new();
        let (users, items) = matrix.shape();

        assert_eq!(users, 0);
        assert_eq!(items, 0);
        assert_eq!(matrix.observed(), 0);
    }

    #[test]
    fn test_empty_queries() {
        let matrix = InteractionMatrix::from_interactions(&[Interaction::new("1", "1", 4.0)]);

        // Querying unknown ids should return None or empty collections
        assert!(matrix.user_index("999").is_none());
        assert!(matrix.item_index("999").is_none());
        assert!(matrix.user_row("999").is_none());
        assert!(matrix.rated_items("999").is_empty());
    }
}
