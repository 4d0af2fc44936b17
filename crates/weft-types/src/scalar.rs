//! Scalar type alias for the simulation.
//!
//! Simulation state (positions, velocities, matrix blocks) is stored in
//! `f32`; the sparse and dense solvers promote to `f64` internally at the
//! factorization boundary.

/// The floating-point type used for simulation state.
///
/// Set to `f32`. Solver internals operate in `f64` regardless.
pub type Scalar = f32;
