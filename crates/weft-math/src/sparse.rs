//! Scalar sparse matrix representation and solver interface.
//!
//! Provides a CSR (Compressed Sparse Row) matrix and a trait for sparse
//! Cholesky solvers. The block-sparse assembly in
//! [`block_sparse`](crate::block_sparse) expands into this format before
//! factorization.

/// Compressed Sparse Row (CSR) matrix with `f64` values.
///
/// Stores a sparse matrix in row-major order. This is the standard
/// format for sparse linear algebra libraries (faer, SuiteSparse).
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Row pointer array (length = rows + 1).
    /// `row_ptr[i]..row_ptr[i+1]` are the indices into `col_idx` and `values`
    /// for non-zeros in row `i`.
    pub row_ptr: Vec<usize>,
    /// Column indices of non-zero entries, sorted within each row.
    pub col_idx: Vec<usize>,
    /// Non-zero values.
    pub values: Vec<f64>,
}

impl CsrMatrix {
    /// Creates an empty CSR matrix with the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_ptr: vec![0; rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Returns the number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Creates a CSR matrix from triplets (row, col, value).
    ///
    /// Entries with the same (row, col) coordinate are summed, matching the
    /// accumulation semantics of block-sparse assembly.
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, f64)]) -> Self {
        // Count entries per row
        let mut row_counts = vec![0usize; rows];
        for &(r, _, _) in triplets {
            row_counts[r] += 1;
        }

        // Build row_ptr
        let mut row_ptr = vec![0usize; rows + 1];
        for i in 0..rows {
            row_ptr[i + 1] = row_ptr[i] + row_counts[i];
        }

        let nnz = row_ptr[rows];
        let mut col_idx = vec![0usize; nnz];
        let mut values = vec![0.0f64; nnz];

        // Fill in — use a copy of row_ptr as write cursor
        let mut cursor = row_ptr[..rows].to_vec();
        for &(r, c, v) in triplets {
            let pos = cursor[r];
            col_idx[pos] = c;
            values[pos] = v;
            cursor[r] += 1;
        }

        // Sort each row by column index
        for i in 0..rows {
            let start = row_ptr[i];
            let end = row_ptr[i + 1];
            let slice = &mut col_idx[start..end];
            let val_slice = &mut values[start..end];

            // Simple insertion sort (rows are typically small)
            for j in 1..slice.len() {
                let mut k = j;
                while k > 0 && slice[k - 1] > slice[k] {
                    slice.swap(k - 1, k);
                    val_slice.swap(k - 1, k);
                    k -= 1;
                }
            }
        }

        // Merge duplicates within each row, summing values
        let mut merged_ptr = vec![0usize; rows + 1];
        let mut merged_cols = Vec::with_capacity(nnz);
        let mut merged_vals = Vec::with_capacity(nnz);
        for i in 0..rows {
            let row_start = merged_cols.len();
            for idx in row_ptr[i]..row_ptr[i + 1] {
                let last = merged_cols.len();
                if last > row_start && merged_cols[last - 1] == col_idx[idx] {
                    merged_vals[last - 1] += values[idx];
                } else {
                    merged_cols.push(col_idx[idx]);
                    merged_vals.push(values[idx]);
                }
            }
            merged_ptr[i + 1] = merged_cols.len();
        }

        Self {
            rows,
            cols,
            row_ptr: merged_ptr,
            col_idx: merged_cols,
            values: merged_vals,
        }
    }

    /// Entry at (row, col); zero if not stored.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        for idx in self.row_ptr[i]..self.row_ptr[i + 1] {
            if self.col_idx[idx] == j {
                return self.values[idx];
            }
        }
        0.0
    }

    /// Dense matrix-vector product `y = A·x`, for residual checks.
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        assert_eq!(x.len(), self.cols, "mul_vec dimension mismatch");
        let mut y = vec![0.0; self.rows];
        for i in 0..self.rows {
            for idx in self.row_ptr[i]..self.row_ptr[i + 1] {
                y[i] += self.values[idx] * x[self.col_idx[idx]];
            }
        }
        y
    }
}

/// Trait for sparse symmetric positive-definite solvers.
///
/// Implemented by [`CholeskySolver`](crate::CholeskySolver) (faer LLᵀ).
pub trait SparseSolver {
    /// Factorize the matrix. Call once per system.
    fn factorize(&mut self, matrix: &CsrMatrix) -> weft_types::WeftResult<()>;

    /// Solve Ax = b using the pre-computed factorization.
    /// Returns x in the provided output buffer.
    fn solve(&self, rhs: &[f64], solution: &mut [f64]) -> weft_types::WeftResult<()>;

    /// Returns true if the solver holds a valid factorization.
    fn is_factorized(&self) -> bool;
}
