//! Sparse Cholesky solver backed by `faer`.
//!
//! Implements the [`SparseSolver`] trait using faer's supernodal LLᵀ
//! factorization. The factorization assumes a symmetric positive-definite
//! system; a non-positive pivot surfaces as [`WeftError::Factorization`].
//!
//! ## Workflow
//! 1. `factorize(matrix)` — converts CSR→CSC, computes symbolic + numeric LLᵀ
//! 2. `solve(rhs, solution)` — forward/backward substitution
//!
//! The implicit integrator re-factorizes every step (the sparsity pattern
//! may change between steps), so no symbolic structure is cached across
//! systems.

use faer::linalg::solvers::Solve;
use faer::sparse::linalg::solvers::{Llt, SymbolicLlt};
use faer::sparse::{SparseColMat, Triplet};
use faer::Side;

use weft_types::{WeftError, WeftResult};

use crate::sparse::{CsrMatrix, SparseSolver};

/// Sparse Cholesky (LLᵀ) solver using `faer`.
pub struct CholeskySolver {
    /// LLᵀ factorization of the last matrix passed to `factorize`.
    factorization: Option<Llt<usize, f64>>,
    /// Matrix dimension (N×N).
    dimension: usize,
}

impl CholeskySolver {
    /// Creates a new solver (unfactorized).
    pub fn new() -> Self {
        Self {
            factorization: None,
            dimension: 0,
        }
    }

    /// Convert a CSR matrix to faer's CSC matrix.
    ///
    /// Builds from faer `Triplet`s, which faer assembles into CSC format.
    fn csr_to_csc(matrix: &CsrMatrix) -> WeftResult<SparseColMat<usize, f64>> {
        let mut triplets: Vec<Triplet<usize, usize, f64>> =
            Vec::with_capacity(matrix.values.len());
        for row in 0..matrix.rows {
            for idx in matrix.row_ptr[row]..matrix.row_ptr[row + 1] {
                triplets.push(Triplet {
                    row,
                    col: matrix.col_idx[idx],
                    val: matrix.values[idx],
                });
            }
        }

        SparseColMat::try_new_from_triplets(matrix.rows, matrix.cols, &triplets).map_err(|e| {
            WeftError::Factorization(format!("Failed to construct faer CSC matrix: {e:?}"))
        })
    }
}

impl Default for CholeskySolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseSolver for CholeskySolver {
    fn factorize(&mut self, matrix: &CsrMatrix) -> WeftResult<()> {
        if matrix.rows != matrix.cols {
            return Err(WeftError::Factorization(format!(
                "Matrix must be square, got {}×{}",
                matrix.rows, matrix.cols
            )));
        }
        if matrix.rows == 0 {
            return Err(WeftError::Factorization(
                "Cannot factorize empty matrix".into(),
            ));
        }

        self.dimension = matrix.rows;

        // Convert CSR → faer CSC
        let csc = Self::csr_to_csc(matrix)?;

        // Step 1: Symbolic analysis (ordering, fill-in prediction)
        let symbolic = SymbolicLlt::try_new(csc.symbolic().as_ref(), Side::Upper)
            .map_err(|e| WeftError::Factorization(format!("Symbolic analysis failed: {e:?}")))?;

        // Step 2: Numeric factorization. Fails when the matrix is not
        // positive definite — fatal for the current step, no fallback.
        let llt = Llt::try_new_with_symbolic(symbolic, csc.as_ref(), Side::Upper).map_err(|e| {
            WeftError::Factorization(format!("Cholesky factorization failed: {e:?}"))
        })?;

        self.factorization = Some(llt);
        Ok(())
    }

    fn solve(&self, rhs: &[f64], solution: &mut [f64]) -> WeftResult<()> {
        let llt = self.factorization.as_ref().ok_or_else(|| {
            WeftError::Factorization("Solver not factorized. Call factorize() first.".into())
        })?;

        if rhs.len() != self.dimension {
            return Err(WeftError::Factorization(format!(
                "RHS length ({}) != matrix dimension ({})",
                rhs.len(),
                self.dimension
            )));
        }
        if solution.len() != self.dimension {
            return Err(WeftError::Factorization(format!(
                "Solution length ({}) != matrix dimension ({})",
                solution.len(),
                self.dimension
            )));
        }

        // Dense column vector RHS
        let rhs_col: faer::Mat<f64> = faer::Mat::from_fn(self.dimension, 1, |i, _| rhs[i]);

        // Solve using the factorization: L Lᵀ x = b
        let sol = llt.solve(&rhs_col);

        for (i, out) in solution.iter_mut().enumerate() {
            *out = sol[(i, 0)];
        }

        Ok(())
    }

    fn is_factorized(&self) -> bool {
        self.factorization.is_some()
    }
}
