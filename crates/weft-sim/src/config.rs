//! Scene configuration.
//!
//! A scene is described by a JSON file: stepping parameters, end
//! conditions, cloth pieces with material parameters and pinned vertices,
//! and time-parameterized obstacles.

use std::path::Path;

use serde::{Deserialize, Serialize};
use weft_mesh::{generators, TriangleMesh};
use weft_types::{WeftError, WeftResult};

use crate::obstacle::Motion;

/// Complete scene configuration for a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Duration of one output frame in seconds.
    pub frame_time: f64,

    /// Number of integration steps per frame.
    pub frame_steps: u32,

    /// Save interval in steps. A checkpoint is written when a step lands on
    /// both a frame boundary and a multiple of this value.
    #[serde(default = "default_save_every")]
    pub save_every: u32,

    /// Simulated end time in seconds. Absent means unbounded.
    #[serde(default = "default_end_time")]
    pub end_time: f64,

    /// Final frame index. Absent means unbounded.
    #[serde(default = "default_end_frame")]
    pub end_frame: u32,

    /// Gravity vector [gx, gy, gz] in m/s².
    #[serde(default = "default_gravity")]
    pub gravity: [f32; 3],

    /// Cloth pieces to simulate.
    pub cloths: Vec<ClothConfig>,

    /// Obstacles (exported, recomputed from time on resume).
    #[serde(default)]
    pub obstacles: Vec<ObstacleConfig>,
}

/// One cloth piece.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClothConfig {
    /// Mesh geometry.
    pub mesh: MeshSource,
    /// Material parameters.
    #[serde(default)]
    pub material: MaterialParams,
    /// Indices of pinned (immovable) vertices.
    #[serde(default)]
    pub pinned: Vec<usize>,
}

/// One obstacle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleConfig {
    /// Base mesh geometry (at time 0).
    pub mesh: MeshSource,
    /// Time-parameterized motion applied to the base mesh.
    #[serde(default)]
    pub motion: Motion,
}

/// Mesh geometry source: procedural grid or inline vertex data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeshSource {
    /// Procedural flat grid (see [`generators::cloth_grid`]).
    Grid {
        /// Grid parameters.
        grid: GridSpec,
    },
    /// Inline mesh data.
    Inline {
        /// The mesh itself.
        inline: TriangleMesh,
    },
}

/// Parameters of a procedural cloth grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSpec {
    /// Quads along X.
    pub cols: usize,
    /// Quads along Y.
    pub rows: usize,
    /// Total width in meters.
    pub width: f32,
    /// Total height in meters.
    pub height: f32,
}

/// Cloth material parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialParams {
    /// Area density in kg/m².
    pub density: f32,
    /// Edge-spring stretch stiffness in N/m.
    pub stretch_stiffness: f32,
    /// Velocity damping coefficient in N·s/m.
    pub damping: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            density: 0.2,
            stretch_stiffness: 500.0,
            damping: 0.1,
        }
    }
}

fn default_save_every() -> u32 {
    1
}

fn default_end_time() -> f64 {
    f64::INFINITY
}

fn default_end_frame() -> u32 {
    u32::MAX
}

fn default_gravity() -> [f32; 3] {
    [0.0, -weft_types::constants::GRAVITY, 0.0]
}

impl MeshSource {
    /// Materializes the mesh described by this source.
    pub fn build(&self) -> WeftResult<TriangleMesh> {
        let mesh = match self {
            MeshSource::Grid { grid } => {
                if grid.cols == 0 || grid.rows == 0 {
                    return Err(WeftError::InvalidConfig(
                        "grid must have at least one quad per axis".into(),
                    ));
                }
                generators::cloth_grid(grid.cols, grid.rows, grid.width, grid.height)
            }
            MeshSource::Inline { inline } => inline.clone(),
        };
        mesh.validate()?;
        Ok(mesh)
    }
}

impl SceneConfig {
    /// Loads and validates a scene configuration from a JSON file.
    pub fn load(path: &Path) -> WeftResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: SceneConfig = serde_json::from_str(&text).map_err(|e| {
            WeftError::InvalidConfig(format!("{}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> WeftResult<()> {
        if !(self.frame_time > 0.0) {
            return Err(WeftError::InvalidConfig(format!(
                "frame_time must be positive, got {}",
                self.frame_time
            )));
        }
        if self.frame_steps == 0 {
            return Err(WeftError::InvalidConfig("frame_steps must be > 0".into()));
        }
        if self.save_every == 0 {
            return Err(WeftError::InvalidConfig("save_every must be > 0".into()));
        }
        if self.cloths.is_empty() {
            return Err(WeftError::InvalidConfig(
                "scene must contain at least one cloth".into(),
            ));
        }
        for (i, cloth) in self.cloths.iter().enumerate() {
            let m = &cloth.material;
            if !(m.density > 0.0) || !(m.stretch_stiffness > 0.0) || m.damping < 0.0 {
                return Err(WeftError::InvalidConfig(format!(
                    "cloth {i}: invalid material (density {}, stiffness {}, damping {})",
                    m.density, m.stretch_stiffness, m.damping
                )));
            }
        }
        Ok(())
    }

    /// Time advanced by one integration step.
    #[inline]
    pub fn step_time(&self) -> f64 {
        self.frame_time / self.frame_steps as f64
    }
}
