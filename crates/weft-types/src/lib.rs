//! # weft-types
//!
//! Shared types, error types, physical constants, and simulation module
//! identifiers for the Weft cloth simulation core.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other Weft crates share.

pub mod constants;
pub mod error;
pub mod module;
pub mod scalar;

pub use error::{WeftError, WeftResult};
pub use module::Module;
pub use scalar::Scalar;
