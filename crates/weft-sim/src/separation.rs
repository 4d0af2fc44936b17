//! Obstacle/cloth separation seam.
//!
//! Proximity-based separation (pushing cloth out of obstacles before
//! dynamics begin) is an external collaborator of the core; this module
//! defines the boundary it plugs into. The driver invokes the separator
//! exactly once, during the relaxation phase of a fresh run — resumed runs
//! skip it, since a checkpoint already encodes a separated state.

use weft_types::WeftResult;

use crate::state::SimulationContext;

/// Pushes interpenetrating cloth out of obstacles before dynamics begin.
pub trait Separator {
    /// Separates all cloths from all obstacle meshes in place.
    fn separate(&mut self, ctx: &mut SimulationContext) -> WeftResult<()>;
}

/// Separator that leaves the state untouched, for scenes whose initial
/// layout is already penetration-free.
#[derive(Debug, Default)]
pub struct NoopSeparator;

impl Separator for NoopSeparator {
    fn separate(&mut self, _ctx: &mut SimulationContext) -> WeftResult<()> {
        Ok(())
    }
}
