//! Truncated singular value decomposition of interaction matrices.
//!
//! This crate provides:
//! - The [`Decomposer`] trait, the seam for decomposition algorithms
//! - [`RandomizedSvd`] (default) and [`ExactSvd`] implementations
//! - [`TruncatedSvd`], the fitted result: latent rows `U_k Σ_k`,
//!   singular values, components `V_kᵀ` and explained variance
//!
//! ## Example Usage
//! ```ignore
//! use factorization::{Decomposer, RandomizedSvd};
//!
//! let svd = RandomizedSvd::new(10).with_seed(42).decompose(matrix.values())?;
//! let user_factors = svd.latent_row(0);
//! ```

pub mod error;
pub mod traits;
pub mod svd;
pub mod randomized;
pub mod exact;

// Re-export main types
pub use error::{FactorizeError, Result};
pub use traits::Decomposer;
pub use svd::{SvdAlgorithm, TruncatedSvd, validate_components};
pub use randomized::RandomizedSvd;
pub use exact::ExactSvd;

/// Build the decomposer for `algorithm`
///
/// `seed`, `power_iterations` and `oversamples` only affect the randomized
/// algorithm.
pub fn build_decomposer(
    algorithm: SvdAlgorithm,
    n_components: usize,
    seed: u64,
    power_iterations: usize,
    oversamples: usize,
) -> Box<dyn Decomposer> {
    match algorithm {
        SvdAlgorithm::Randomized => Box::new(
            RandomizedSvd::new(n_components)
                .with_seed(seed)
                .with_power_iterations(power_iterations)
                .with_oversamples(oversamples),
        ),
        SvdAlgorithm::Exact => Box::new(ExactSvd::new(n_components)),
    }
}
