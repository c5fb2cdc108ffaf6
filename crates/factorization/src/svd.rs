//! The fitted truncated SVD and the post-processing shared by all algorithms.
//!
//! Whatever algorithm produced the raw `U`, `σ` and `Vᵀ`, the result goes
//! through the same steps here:
//! 1. Order singular triplets by descending singular value and keep `k`
//! 2. Fix the sign of every component (largest-magnitude entry of each
//!    `Vᵀ` row is positive) so output is deterministic
//! 3. Project users: `transformed = U_k Σ_k`
//! 4. Compute the explained variance ratio of each component

use crate::error::{FactorizeError, Result};
use nalgebra::{DMatrix, DVector, RowDVector};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which truncated SVD algorithm to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SvdAlgorithm {
    /// Randomized range finder followed by a small dense SVD
    #[default]
    Randomized,
    /// Full dense SVD, truncated afterwards
    Exact,
}

/// Result of a truncated SVD of an `m × n` matrix with `k` components
#[derive(Debug, Clone)]
pub struct TruncatedSvd {
    /// `m × k`, one latent row per input row
    pub(crate) transformed: DMatrix<f64>,
    /// `k` singular values, descending
    pub(crate) singular_values: DVector<f64>,
    /// `k × n`, the right singular vectors as rows
    pub(crate) components: DMatrix<f64>,
    pub(crate) explained_variance_ratio: Vec<f64>,
}

impl TruncatedSvd {
    /// Assemble the result from raw factors of `matrix`.
    ///
    /// `u` is `m × r`, `singular_values` has length `r`, `v_t` is `r × n`,
    /// in any order. Requires `r >= k`.
    pub(crate) fn from_parts(
        matrix: &DMatrix<f64>,
        u: &DMatrix<f64>,
        singular_values: &DVector<f64>,
        v_t: &DMatrix<f64>,
        k: usize,
    ) -> Result<Self> {
        if singular_values.len() < k {
            return Err(FactorizeError::Decomposition(format!(
                "only {} singular values available for {} components",
                singular_values.len(),
                k
            )));
        }

        let mut order: Vec<usize> = (0..singular_values.len()).collect();
        order.sort_by(|&i, &j| {
            singular_values[j]
                .partial_cmp(&singular_values[i])
                .unwrap_or(Ordering::Equal)
        });
        order.truncate(k);

        let mut u_k = DMatrix::<f64>::zeros(u.nrows(), k);
        let mut v_t_k = DMatrix::<f64>::zeros(k, v_t.ncols());
        let mut s_k = DVector::<f64>::zeros(k);
        for (dst, &src) in order.iter().enumerate() {
            u_k.set_column(dst, &u.column(src));
            v_t_k.set_row(dst, &v_t.row(src));
            s_k[dst] = singular_values[src];
        }

        flip_signs(&mut u_k, &mut v_t_k);

        let transformed = &u_k * DMatrix::from_diagonal(&s_k);
        let explained_variance_ratio = explained_variance_ratio(matrix, &transformed);

        Ok(Self {
            transformed,
            singular_values: s_k,
            components: v_t_k,
            explained_variance_ratio,
        })
    }

    /// Number of kept components
    pub fn n_components(&self) -> usize {
        self.singular_values.len()
    }

    /// The `m × k` latent representation `U_k Σ_k`
    pub fn transformed(&self) -> &DMatrix<f64> {
        &self.transformed
    }

    /// Singular values, largest first
    pub fn singular_values(&self) -> &[f64] {
        self.singular_values.as_slice()
    }

    /// The `k × n` component matrix `V_kᵀ`
    pub fn components(&self) -> &DMatrix<f64> {
        &self.components
    }

    /// Share of the input's total variance captured by each component
    pub fn explained_variance_ratio(&self) -> &[f64] {
        &self.explained_variance_ratio
    }

    /// Latent row of input row `row`, or `None` if out of range
    pub fn latent_row(&self, row: usize) -> Option<RowDVector<f64>> {
        (row < self.transformed.nrows()).then(|| self.transformed.row(row).into_owned())
    }
}

/// Check that a `rows × cols` matrix can be decomposed into `k` components
pub fn validate_components(rows: usize, cols: usize, k: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(FactorizeError::EmptyMatrix { rows, cols });
    }
    if k == 0 {
        return Err(FactorizeError::InvalidComponents);
    }
    let max = rows.min(cols);
    if k > max {
        return Err(FactorizeError::TooManyComponents { requested: k, max });
    }
    Ok(())
}

/// Dense SVD with both singular vector sets.
///
/// Uses nalgebra's default convergence tolerance (`5ε`); tighter tolerances
/// can settle on wrong singular values for rank-deficient input. The sweep
/// count is capped at `6·n²` (at least 1000) for `n = min(rows, cols)`.
pub(crate) fn dense_svd(
    matrix: DMatrix<f64>,
) -> Result<(DMatrix<f64>, DVector<f64>, DMatrix<f64>)> {
    let n = matrix.nrows().min(matrix.ncols());
    let max_iterations = (6 * n * n).max(1_000);

    let svd = matrix
        .try_svd(true, true, f64::EPSILON * 5.0, max_iterations)
        .ok_or_else(|| {
            FactorizeError::Decomposition(format!(
                "SVD did not converge within {} iterations",
                max_iterations
            ))
        })?;
    let u = svd.u.ok_or_else(|| {
        FactorizeError::Decomposition("left singular vectors not computed".to_string())
    })?;
    let v_t = svd.v_t.ok_or_else(|| {
        FactorizeError::Decomposition("right singular vectors not computed".to_string())
    })?;
    Ok((u, svd.singular_values, v_t))
}

/// Make the largest-magnitude entry of every `Vᵀ` row positive,
/// flipping the matching `U` column along with it
fn flip_signs(u: &mut DMatrix<f64>, v_t: &mut DMatrix<f64>) {
    for i in 0..v_t.nrows() {
        let pivot = v_t
            .row(i)
            .iter()
            .copied()
            .fold(0.0_f64, |best, x| if x.abs() > best.abs() { x } else { best });
        if pivot < 0.0 {
            v_t.row_mut(i).neg_mut();
            u.column_mut(i).neg_mut();
        }
    }
}

fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n
}

/// Variance of each transformed column over the summed column variance of the input
fn explained_variance_ratio(matrix: &DMatrix<f64>, transformed: &DMatrix<f64>) -> Vec<f64> {
    let total: f64 = (0..matrix.ncols())
        .into_par_iter()
        .map(|j| {
            let column: Vec<f64> = matrix.column(j).iter().copied().collect();
            population_variance(&column)
        })
        .sum();

    if total <= 0.0 {
        return vec![0.0; transformed.ncols()];
    }

    (0..transformed.ncols())
        .map(|j| {
            let column: Vec<f64> = transformed.column(j).iter().copied().collect();
            population_variance(&column) / total
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_components() {
        assert!(validate_components(3, 4, 3).is_ok());
        assert_eq!(
            validate_components(0, 4, 1),
            Err(FactorizeError::EmptyMatrix { rows: 0, cols: 4 })
        );
        assert_eq!(
            validate_components(3, 4, 0),
            Err(FactorizeError::InvalidComponents)
        );
        assert_eq!(
            validate_components(3, 2, 3),
            Err(FactorizeError::TooManyComponents { requested: 3, max: 2 })
        );
    }

    #[test]
    fn test_population_variance() {
        assert_eq!(population_variance(&[]), 0.0);
        assert_eq!(population_variance(&[2.0, 2.0]), 0.0);
        assert!((population_variance(&[1.0, 3.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_parts_orders_and_flips() {
        // Singular values deliberately out of order, first V row negative
        let matrix = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -2.0, 0.0]);
        let u = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]);
        let s = DVector::from_vec(vec![1.0, 2.0]);
        let v_t = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -1.0, 0.0]);

        let svd = TruncatedSvd::from_parts(&matrix, &u, &s, &v_t, 2).unwrap();

        assert_eq!(svd.singular_values(), &[2.0, 1.0]);
        // Row for σ=2 was [-1, 0]; flipped to [1, 0] with its U column
        assert_eq!(svd.components().row(0).iter().copied().collect::<Vec<_>>(), vec![1.0, 0.0]);
        assert_eq!(svd.transformed()[(1, 0)], -2.0);
        // U Σ Vᵀ still reproduces the input
        let rebuilt = svd.transformed() * svd.components();
        assert!((rebuilt - matrix).amax() < 1e-12);
    }

    #[test]
    fn test_from_parts_not_enough_values() {
        let matrix = DMatrix::from_element(2, 2, 1.0);
        let u = DMatrix::identity(2, 1);
        let s = DVector::from_vec(vec![2.0]);
        let v_t = DMatrix::from_element(1, 2, 0.5);

        let err = TruncatedSvd::from_parts(&matrix, &u, &s, &v_t, 2).unwrap_err();
        assert!(matches!(err, FactorizeError::Decomposition(_)));
    }

    #[test]
    fn test_zero_variance_input() {
        let matrix = DMatrix::from_element(3, 2, 1.0);
        let transformed = DMatrix::from_element(3, 1, 1.0);
        assert_eq!(explained_variance_ratio(&matrix, &transformed), vec![0.0]);
    }
}
