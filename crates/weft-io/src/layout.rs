//! On-disk layout of a simulation output directory.
//!
//! ```text
//! <out>/
//!   conf.json              copied scene configuration
//!   obs/obs<i>.obj         obstacle base meshes (written once, at start)
//!   timing                 append-only per-module timing deltas
//!   <00000>                binary state checkpoint, zero-padded frame index
//!   cloth<i>_frame<f>.obj  per-cloth mesh export at frame f
//!   obstacle<i>_frame<f>.obj
//! ```

use std::path::{Path, PathBuf};

/// Path of the binary checkpoint for `frame` (zero-padded to 5 digits).
pub fn checkpoint_path(out_dir: &Path, frame: u32) -> PathBuf {
    out_dir.join(format!("{frame:05}"))
}

/// Path of the copied scene configuration.
pub fn conf_path(out_dir: &Path) -> PathBuf {
    out_dir.join("conf.json")
}

/// Directory holding obstacle base meshes.
pub fn obstacle_base_dir(out_dir: &Path) -> PathBuf {
    out_dir.join("obs")
}

/// Path of obstacle `index`'s base mesh export.
pub fn obstacle_base_path(out_dir: &Path, index: usize) -> PathBuf {
    obstacle_base_dir(out_dir).join(format!("obs{index}.obj"))
}

/// Path of the append-only timing log.
pub fn timing_path(out_dir: &Path) -> PathBuf {
    out_dir.join("timing")
}

/// Path of cloth `index`'s mesh export at `frame`.
pub fn cloth_obj_path(out_dir: &Path, index: usize, frame: u32) -> PathBuf {
    out_dir.join(format!("cloth{index}_frame{frame}.obj"))
}

/// Path of obstacle `index`'s mesh export at `frame`.
pub fn obstacle_obj_path(out_dir: &Path, index: usize, frame: u32) -> PathBuf {
    out_dir.join(format!("obstacle{index}_frame{frame}.obj"))
}
