//! Block-sparse matrices and the block linear solve.
//!
//! The implicit integrator assembles its system as a square matrix of 3×3
//! blocks (one row per cloth vertex). [`assemble_scalar_system`] flattens
//! the blocks into a scalar [`CsrMatrix`], and [`linear_solve`] composes
//! assembly, a fresh Cholesky factorization, and per-node unpacking of the
//! solution.
//!
//! Block matrices are transient: assembled by the integrator each step,
//! consumed once by the solver, and dropped.

use weft_types::WeftResult;

use crate::block::Block;
use crate::cholesky::CholeskySolver;
use crate::sparse::{CsrMatrix, SparseSolver};

/// One row of a block-sparse matrix.
///
/// `cols` and `blocks` are parallel arrays; column indices are strictly
/// increasing and unique within a row.
#[derive(Debug, Clone)]
pub struct BlockRow<B> {
    /// Column indices of stored blocks, sorted ascending.
    pub cols: Vec<usize>,
    /// Block values, aligned with `cols`.
    pub blocks: Vec<B>,
}

impl<B> BlockRow<B> {
    fn empty() -> Self {
        Self {
            cols: Vec::new(),
            blocks: Vec::new(),
        }
    }
}

/// Row-major sparse matrix of fixed-size blocks.
///
/// Square when used as a system matrix; the scalar expansion has dimension
/// `B::WIDTH * rows`.
#[derive(Debug, Clone)]
pub struct BlockSparseMatrix<B: Block> {
    rows: Vec<BlockRow<B>>,
}

impl<B: Block> BlockSparseMatrix<B> {
    /// Creates a block matrix with `n` empty rows.
    pub fn new(n: usize) -> Self {
        Self {
            rows: (0..n).map(|_| BlockRow::empty()).collect(),
        }
    }

    /// Number of block rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The rows of the matrix.
    pub fn block_rows(&self) -> &[BlockRow<B>] {
        &self.rows
    }

    /// Total number of stored blocks.
    pub fn nnz_blocks(&self) -> usize {
        self.rows.iter().map(|r| r.cols.len()).sum()
    }

    /// Adds `block` at (row `i`, col `j`), summing into an existing entry.
    ///
    /// Maintains the sorted-unique column invariant of each row.
    pub fn add_block(&mut self, i: usize, j: usize, block: B) {
        let row = &mut self.rows[i];
        match row.cols.binary_search(&j) {
            Ok(pos) => row.blocks[pos].accumulate(&block),
            Err(pos) => {
                row.cols.insert(pos, j);
                row.blocks.insert(pos, block);
            }
        }
    }

    /// Returns the block at (i, j), if stored.
    pub fn block(&self, i: usize, j: usize) -> Option<&B> {
        let row = &self.rows[i];
        row.cols.binary_search(&j).ok().map(|pos| &row.blocks[pos])
    }
}

/// Expands a block-sparse matrix into a scalar CSR system.
///
/// Every stored block at (i, j) emits `WIDTH²` scalar triplets at
/// `(WIDTH·i + k, WIDTH·j + h)` for k, h in `[0, WIDTH)`. Deterministic:
/// equal inputs produce identical scalar systems. Duplicate coordinates
/// (which cannot arise from a well-formed block matrix, but may from raw
/// triplet sources) accumulate by summation in [`CsrMatrix::from_triplets`].
pub fn assemble_scalar_system<B: Block>(matrix: &BlockSparseMatrix<B>) -> CsrMatrix {
    let w = B::WIDTH;
    let dim = matrix.len() * w;

    let mut triplets: Vec<(usize, usize, f64)> = Vec::with_capacity(matrix.nnz_blocks() * w * w);
    for (i, row) in matrix.block_rows().iter().enumerate() {
        for (slot, &j) in row.cols.iter().enumerate() {
            let block = &row.blocks[slot];
            for k in 0..w {
                for h in 0..w {
                    triplets.push((w * i + k, w * j + h, block.entry(k, h)));
                }
            }
        }
    }

    CsrMatrix::from_triplets(dim, dim, &triplets)
}

/// Solves `matrix · x = rhs` for a symmetric positive-definite block system.
///
/// Expands the block matrix to scalars, computes a fresh Cholesky
/// factorization (no caching across calls — the sparsity pattern may change
/// between steps), solves, and unpacks per-node values.
///
/// # Panics
///
/// Panics if `matrix.len() != rhs.len()` — a mismatched system is a caller
/// bug, not a recoverable condition.
///
/// # Errors
///
/// [`WeftError::Factorization`](weft_types::WeftError::Factorization) when
/// the expanded system is not positive definite. The caller must treat this
/// as fatal for the current step.
pub fn linear_solve<B: Block>(
    matrix: &BlockSparseMatrix<B>,
    rhs: &[B::Rhs],
) -> WeftResult<Vec<B::Rhs>> {
    assert_eq!(
        matrix.len(),
        rhs.len(),
        "block matrix rows ({}) != rhs length ({})",
        matrix.len(),
        rhs.len()
    );

    let system = assemble_scalar_system(matrix);

    let mut solver = CholeskySolver::new();
    solver.factorize(&system)?;

    let w = B::WIDTH;
    let mut flat_rhs = Vec::with_capacity(rhs.len() * w);
    for value in rhs {
        for k in 0..w {
            flat_rhs.push(B::rhs_entry(value, k));
        }
    }

    let mut flat_sol = vec![0.0f64; flat_rhs.len()];
    solver.solve(&flat_rhs, &mut flat_sol)?;

    Ok(flat_sol.chunks_exact(w).map(B::rhs_collect).collect())
}
