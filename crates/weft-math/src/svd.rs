//! Singular value decomposition for dense rectangular matrices.
//!
//! Used for principal-stretch extraction from deformation gradients.
//! Backed by `nalgebra`'s SVD.
//!
//! ## Convention
//!
//! The decomposition is the thin SVD `A = U·Σ·Vᵗ`: for an m×n input with
//! r = min(m, n), `u` is m×r, `vt` is r×n (V is returned **transposed**,
//! row i of `vt` is the i-th right singular vector), and `singular_values`
//! has length r in descending order. One convention, applied everywhere —
//! consumers never index V directly with U's strides.

use weft_types::{WeftError, WeftResult};

use crate::dense::DenseMatrix;

/// Convergence threshold for the iterative SVD.
const SVD_EPS: f64 = 1.0e-12;

/// Iteration cap; exceeding it reports non-convergence.
const SVD_MAX_ITER: usize = 250;

/// Result of a singular value decomposition `A = U·Σ·Vᵗ`.
#[derive(Debug, Clone)]
pub struct SvdDecomposition {
    /// Singular values in descending order, length min(m, n).
    pub singular_values: Vec<f64>,
    /// Left singular vectors as columns (m × min(m, n)), orthonormal.
    pub u: DenseMatrix,
    /// Right singular vectors as **rows** (min(m, n) × n), orthonormal.
    pub vt: DenseMatrix,
}

impl SvdDecomposition {
    /// Reconstructs `U·Σ·Vᵗ` — the original matrix up to solver tolerance.
    pub fn reconstruct(&self) -> DenseMatrix {
        let r = self.singular_values.len();
        let m = self.u.rows();
        let n = self.vt.cols();
        DenseMatrix::from_fn(m, n, |i, j| {
            (0..r)
                .map(|k| self.u.get(i, k) * self.singular_values[k] * self.vt.get(k, j))
                .sum()
        })
    }
}

/// Computes the thin singular value decomposition of an m×n matrix.
///
/// # Errors
///
/// [`WeftError::Decomposition`] when the underlying method does not
/// converge. No partial results are exposed on failure.
pub fn svd(matrix: &DenseMatrix) -> WeftResult<SvdDecomposition> {
    let a = matrix.to_nalgebra();
    let result = a
        .try_svd(true, true, SVD_EPS, SVD_MAX_ITER)
        .ok_or_else(|| WeftError::Decomposition("SVD did not converge".into()))?;

    let u = result
        .u
        .ok_or_else(|| WeftError::Decomposition("SVD produced no U factor".into()))?;
    let v_t = result
        .v_t
        .ok_or_else(|| WeftError::Decomposition("SVD produced no V factor".into()))?;

    // Sort descending explicitly rather than relying on backend ordering;
    // permute U columns and Vᵗ rows to keep A = U·Σ·Vᵗ intact.
    let r = result.singular_values.len();
    let mut order: Vec<usize> = (0..r).collect();
    order.sort_by(|&p, &q| result.singular_values[q].total_cmp(&result.singular_values[p]));

    let singular_values = order.iter().map(|&p| result.singular_values[p]).collect();
    let u = DenseMatrix::from_fn(u.nrows(), r, |i, j| u[(i, order[j])]);
    let vt = DenseMatrix::from_fn(r, v_t.ncols(), |i, j| v_t[(order[i], j)]);

    Ok(SvdDecomposition {
        singular_values,
        u,
        vt,
    })
}
