//! Physical constants and simulation defaults.

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f32 = 9.81;

/// Epsilon for floating-point comparisons.
pub const EPSILON: f32 = 1.0e-7;

/// Epsilon for degenerate triangle detection (area threshold).
pub const DEGENERATE_AREA_THRESHOLD: f32 = 1.0e-10;

/// Frames at or beyond this index are never exported. Bounds the width of
/// zero-padded checkpoint filenames, not the length of the simulation.
pub const MAX_EXPORT_FRAME: u32 = 100_000;
