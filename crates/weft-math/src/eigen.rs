//! Symmetric dense eigendecomposition.
//!
//! Used for local stress/strain analysis: the Green strain tensor and
//! related small symmetric matrices. Backed by `nalgebra`'s symmetric
//! eigensolver.

use weft_types::{WeftError, WeftResult};

use crate::dense::DenseMatrix;

/// Convergence threshold for the iterative eigensolver.
const EIGEN_EPS: f64 = 1.0e-12;

/// Iteration cap; exceeding it reports non-convergence.
const EIGEN_MAX_ITER: usize = 250;

/// Result of a symmetric eigendecomposition.
#[derive(Debug, Clone)]
pub struct Eigendecomposition {
    /// Eigenvalues in ascending order.
    pub values: Vec<f64>,
    /// Eigenvectors as columns, aligned with `values`; unit-norm and
    /// mutually orthogonal. `None` when vectors were not requested.
    pub vectors: Option<DenseMatrix>,
}

/// Computes the eigendecomposition of a symmetric matrix.
///
/// The input is assumed symmetric; it is symmetrized internally as
/// `(A + Aᵗ)/2`, so only one triangle needs to be meaningful. Eigenvalues
/// are returned ascending. When `compute_vectors` is false only the values
/// are computed (the full decomposition is strictly more expensive) and
/// `vectors` is `None`.
///
/// # Panics
///
/// Panics if the matrix is not square.
///
/// # Errors
///
/// [`WeftError::Decomposition`] when the underlying method does not
/// converge. No partial results are exposed on failure.
pub fn eigendecompose(
    matrix: &DenseMatrix,
    compute_vectors: bool,
) -> WeftResult<Eigendecomposition> {
    assert_eq!(
        matrix.rows(),
        matrix.cols(),
        "eigendecompose requires a square matrix, got {}×{}",
        matrix.rows(),
        matrix.cols()
    );

    let n = matrix.rows();
    let a = matrix.to_nalgebra();
    let sym = (&a + a.transpose()) * 0.5;

    if !compute_vectors {
        let mut values: Vec<f64> = sym.symmetric_eigenvalues().iter().copied().collect();
        values.sort_by(f64::total_cmp);
        return Ok(Eigendecomposition {
            values,
            vectors: None,
        });
    }

    let eig = sym.try_symmetric_eigen(EIGEN_EPS, EIGEN_MAX_ITER).ok_or_else(|| {
        WeftError::Decomposition("symmetric eigendecomposition did not converge".into())
    })?;

    // nalgebra returns eigenpairs unordered; sort ascending and permute
    // the eigenvector columns to match.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&p, &q| eig.eigenvalues[p].total_cmp(&eig.eigenvalues[q]));

    let values = order.iter().map(|&p| eig.eigenvalues[p]).collect();
    let vectors = DenseMatrix::from_fn(n, n, |i, j| eig.eigenvectors[(i, order[j])]);

    Ok(Eigendecomposition {
        values,
        vectors: Some(vectors),
    })
}
