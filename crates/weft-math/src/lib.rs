//! # weft-math
//!
//! Linear algebra primitives for the Weft simulation core.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec3`, `Mat3`, etc.)
//! - Block-sparse matrices (scalar or 3×3 blocks) and their expansion
//!   into scalar sparse systems
//! - Sparse Cholesky solve backed by `faer` (SPD assumption)
//! - A dense column-major matrix abstraction with symmetric
//!   eigendecomposition and SVD backed by `nalgebra`

pub mod block;
pub mod block_sparse;
pub mod cholesky;
pub mod dense;
pub mod eigen;
pub mod sparse;
pub mod svd;

pub use block::Block;
pub use block_sparse::{assemble_scalar_system, linear_solve, BlockSparseMatrix};
pub use cholesky::CholeskySolver;
pub use dense::DenseMatrix;
pub use eigen::{eigendecompose, Eigendecomposition};
pub use sparse::{CsrMatrix, SparseSolver};
pub use svd::{svd, SvdDecomposition};

// Re-export glam types as the canonical math types for Weft.
pub use glam::{Mat3, Vec2, Vec3};
