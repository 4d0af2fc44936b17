//! # weft-io
//!
//! The persistence boundary of the Weft simulation core: binary state
//! checkpoints, OBJ mesh export, and the on-disk layout of a simulation
//! output directory.

pub mod checkpoint;
pub mod layout;
pub mod obj;

pub use checkpoint::{load_checkpoint, save_checkpoint, Checkpoint, ClothSnapshot};
