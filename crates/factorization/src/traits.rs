//! The seam between the recommender and the decomposition algorithms.

use crate::error::Result;
use crate::svd::TruncatedSvd;
use nalgebra::DMatrix;

/// A truncated singular value decomposition strategy.
///
/// `Send + Sync` so a configured decomposer can be shared across threads.
pub trait Decomposer: Send + Sync {
    /// Short name of the algorithm (for logging)
    fn name(&self) -> &str;

    /// Number of components this decomposer keeps
    fn n_components(&self) -> usize;

    /// Decompose `matrix`, keeping the `n_components()` largest singular triplets.
    ///
    /// # Errors
    /// * `EmptyMatrix` - `matrix` has no rows or no columns
    /// * `InvalidComponents` / `TooManyComponents` - the component count does
    ///   not fit the matrix
    /// * `Decomposition` - the numerical routine failed
    fn decompose(&self, matrix: &DMatrix<f64>) -> Result<TruncatedSvd>;
}
