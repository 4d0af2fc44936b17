//! Time-parameterized obstacles.
//!
//! Obstacle geometry is a pure function of simulation time: a base mesh
//! plus a motion. Derived meshes are never persisted in checkpoints; on
//! resume they are recomputed from the resume time.

use serde::{Deserialize, Serialize};
use weft_math::Vec3;
use weft_mesh::TriangleMesh;

/// Rigid obstacle motion over time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// The obstacle never moves.
    #[default]
    Static,
    /// Constant-velocity translation from the base pose.
    Linear {
        /// Velocity in m/s.
        velocity: [f32; 3],
    },
}

/// An obstacle: base geometry plus its motion.
#[derive(Debug, Clone)]
pub struct Obstacle {
    /// Geometry at time 0.
    pub base: TriangleMesh,
    /// Motion applied to the base mesh.
    pub motion: Motion,
}

impl Obstacle {
    /// The obstacle's mesh at simulation time `time`.
    pub fn mesh_at(&self, time: f64) -> TriangleMesh {
        let mut mesh = self.base.clone();
        match &self.motion {
            Motion::Static => {}
            Motion::Linear { velocity } => {
                let t = time as f32;
                mesh.translate(Vec3::new(velocity[0] * t, velocity[1] * t, velocity[2] * t));
            }
        }
        mesh
    }
}
