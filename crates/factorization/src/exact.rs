//! Exact truncated SVD: full dense decomposition, then keep the top `k`.
//!
//! Costs a full SVD of the interaction matrix, so it is meant for small
//! data sets and for checking the randomized algorithm.

use crate::error::Result;
use crate::svd::{TruncatedSvd, dense_svd, validate_components};
use crate::traits::Decomposer;
use nalgebra::DMatrix;
use tracing::debug;

/// Exact truncated SVD
#[derive(Debug, Clone)]
pub struct ExactSvd {
    n_components: usize,
}

impl ExactSvd {
    pub fn new(n_components: usize) -> Self {
        Self { n_components }
    }
}

impl Decomposer for ExactSvd {
    fn name(&self) -> &str {
        "exact"
    }

    fn n_components(&self) -> usize {
        self.n_components
    }

    fn decompose(&self, matrix: &DMatrix<f64>) -> Result<TruncatedSvd> {
        let (rows, cols) = matrix.shape();
        validate_components(rows, cols, self.n_components)?;
        debug!("Exact SVD: {}x{} matrix, k={}", rows, cols, self.n_components);

        let (u, singular_values, v_t) = dense_svd(matrix.clone())?;
        TruncatedSvd::from_parts(matrix, &u, &singular_values, &v_t, self.n_components)
    }
}
