//! Randomized truncated SVD.
//!
//! ## Algorithm
//! 1. Draw a seeded Gaussian test matrix `Ω` (`n × (k + p)`)
//! 2. Sample the range of `A`: `Q = orth(A Ω)`
//! 3. Sharpen with `q` power iterations: `Q = orth(A orth(Aᵀ Q))`
//! 4. Project onto the sampled basis: `B = Qᵀ A` (small, `(k + p) × n`)
//! 5. Dense SVD of `B`, then lift back: `U = Q Û`
//!
//! The oversampled width `k + p` is clamped to `min(m, n)`. With the same
//! seed and input the result is identical run to run.

use crate::error::Result;
use crate::svd::{TruncatedSvd, dense_svd, validate_components};
use crate::traits::Decomposer;
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::debug;

/// Randomized truncated SVD with a fixed seed
#[derive(Debug, Clone)]
pub struct RandomizedSvd {
    n_components: usize,
    seed: u64,
    power_iterations: usize,
    oversamples: usize,
}

impl RandomizedSvd {
    /// Create a decomposer keeping `n_components` components
    ///
    /// Defaults: seed 42, 5 power iterations, 10 oversamples.
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            seed: 42,
            power_iterations: 5,
            oversamples: 10,
        }
    }

    /// Configure the random seed (default: 42)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Configure the number of power iterations (default: 5)
    pub fn with_power_iterations(mut self, power_iterations: usize) -> Self {
        self.power_iterations = power_iterations;
        self
    }

    /// Configure the number of extra sampled directions (default: 10)
    pub fn with_oversamples(mut self, oversamples: usize) -> Self {
        self.oversamples = oversamples;
        self
    }
}

impl Decomposer for RandomizedSvd {
    fn name(&self) -> &str {
        "randomized"
    }

    fn n_components(&self) -> usize {
        self.n_components
    }

    fn decompose(&self, matrix: &DMatrix<f64>) -> Result<TruncatedSvd> {
        let (rows, cols) = matrix.shape();
        validate_components(rows, cols, self.n_components)?;

        let width = (self.n_components + self.oversamples).min(rows.min(cols));
        debug!(
            "Randomized SVD: {}x{} matrix, k={}, width={}, power_iterations={}, seed={}",
            rows, cols, self.n_components, width, self.power_iterations, self.seed
        );

        let mut rng = StdRng::seed_from_u64(self.seed);
        let omega = DMatrix::<f64>::from_fn(cols, width, |_, _| rng.sample(StandardNormal));

        let transposed = matrix.transpose();
        let mut q = orthonormalize(matrix * &omega);
        for _ in 0..self.power_iterations {
            let z = orthonormalize(&transposed * &q);
            q = orthonormalize(matrix * &z);
        }

        let projected = q.transpose() * matrix;
        let (u_hat, singular_values, v_t) = dense_svd(projected)?;

        let u = &q * u_hat;
        TruncatedSvd::from_parts(matrix, &u, &singular_values, &v_t, self.n_components)
    }
}

/// Orthonormal basis of the column space (thin QR)
fn orthonormalize(matrix: DMatrix<f64>) -> DMatrix<f64> {
    matrix.qr().q()
}
