//! Block entry types for block-sparse matrices.
//!
//! A block-sparse system matrix stores either plain scalars (width 1) or
//! 3×3 tensors (width 3) per entry. The [`Block`] trait abstracts over the
//! two so that assembly and solve code is written once.

use glam::{Mat3, Vec3};

/// A fixed-size block stored in a [`BlockSparseMatrix`](crate::BlockSparseMatrix).
///
/// `WIDTH` is the scalar dimension of the block (the expanded scalar system
/// has dimension `WIDTH * n` for an n-row block matrix). `Rhs` is the
/// per-node right-hand-side type aligned with this block width.
pub trait Block: Copy {
    /// Scalar width of the block (1 for scalars, 3 for 3×3 tensors).
    const WIDTH: usize;

    /// Per-node right-hand-side / solution value for this block width.
    type Rhs: Copy + Default;

    /// Scalar entry at (row `k`, column `h`) of the block, `k, h < WIDTH`.
    fn entry(&self, k: usize, h: usize) -> f64;

    /// Accumulates another block into this one (entrywise sum).
    fn accumulate(&mut self, other: &Self);

    /// Scalar component `k` of a right-hand-side value.
    fn rhs_entry(rhs: &Self::Rhs, k: usize) -> f64;

    /// Rebuilds a right-hand-side value from `WIDTH` scalar components.
    fn rhs_collect(components: &[f64]) -> Self::Rhs;
}

impl Block for f32 {
    const WIDTH: usize = 1;
    type Rhs = f32;

    #[inline]
    fn entry(&self, _k: usize, _h: usize) -> f64 {
        *self as f64
    }

    #[inline]
    fn accumulate(&mut self, other: &Self) {
        *self += other;
    }

    #[inline]
    fn rhs_entry(rhs: &Self::Rhs, _k: usize) -> f64 {
        *rhs as f64
    }

    #[inline]
    fn rhs_collect(components: &[f64]) -> Self::Rhs {
        components[0] as f32
    }
}

impl Block for Mat3 {
    const WIDTH: usize = 3;
    type Rhs = Vec3;

    /// glam matrices are column-major: row `k` of column `h`.
    #[inline]
    fn entry(&self, k: usize, h: usize) -> f64 {
        self.col(h)[k] as f64
    }

    #[inline]
    fn accumulate(&mut self, other: &Self) {
        *self += *other;
    }

    #[inline]
    fn rhs_entry(rhs: &Self::Rhs, k: usize) -> f64 {
        rhs[k] as f64
    }

    #[inline]
    fn rhs_collect(components: &[f64]) -> Self::Rhs {
        Vec3::new(
            components[0] as f32,
            components[1] as f32,
            components[2] as f32,
        )
    }
}
