//! Binary state checkpoints.
//!
//! A checkpoint captures everything needed to resume stepping without
//! replaying prior steps: counters, time, and per-cloth positions and
//! velocities. Obstacle meshes are deliberately absent — they are a pure
//! function of time and are recomputed on resume.
//!
//! Serialized with `bincode` for compact binary output, and written
//! atomically (temp file + rename) so a crash mid-write never leaves a
//! truncated checkpoint under the frame-indexed name.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use weft_types::{WeftError, WeftResult};

/// Per-cloth state snapshot.
///
/// Flat layout: `positions = [x0, y0, z0, x1, y1, z1, ...]`, likewise for
/// velocities. Restoring these bytes reproduces the cloth state bit-for-bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothSnapshot {
    /// Vertex positions, flattened.
    pub positions: Vec<f32>,
    /// Vertex velocities, flattened.
    pub velocities: Vec<f32>,
}

/// A complete simulation state checkpoint for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Frame index this checkpoint was taken at.
    pub frame: u32,
    /// Step counter at this frame (`frame * frame_steps`).
    pub step: u32,
    /// Simulation time in seconds.
    pub time: f64,
    /// One snapshot per cloth, in scene order.
    pub cloths: Vec<ClothSnapshot>,
}

/// Writes a checkpoint to `path` atomically.
pub fn save_checkpoint(checkpoint: &Checkpoint, path: &Path) -> WeftResult<()> {
    let bytes = bincode::serialize(checkpoint)
        .map_err(|e| WeftError::Serialization(format!("checkpoint encode failed: {e}")))?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reads a checkpoint back from `path`.
pub fn load_checkpoint(path: &Path) -> WeftResult<Checkpoint> {
    let bytes = fs::read(path)?;
    bincode::deserialize(&bytes)
        .map_err(|e| WeftError::Serialization(format!("checkpoint decode failed: {e}")))
}
