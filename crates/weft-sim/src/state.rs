//! Simulation state — the single mutable record of a running simulation.
//!
//! [`SimulationContext`] replaces the process-wide globals of older cloth
//! simulators: it owns time, frame/step counters, cloth and obstacle
//! state, and per-module timers, and is passed explicitly into the driver
//! and integrator.

use weft_io::{Checkpoint, ClothSnapshot};
use weft_math::Vec3;
use weft_mesh::TriangleMesh;
use weft_types::{WeftError, WeftResult};

use crate::config::{ClothConfig, MaterialParams, SceneConfig};
use crate::obstacle::Obstacle;
use crate::timer::ModuleTimers;

/// Per-cloth mutable state: mesh positions plus SoA velocity buffers.
#[derive(Debug, Clone)]
pub struct ClothState {
    /// Current mesh (positions mutate, topology fixed).
    pub mesh: TriangleMesh,
    /// Rest-state mesh, for strain analysis and spring rest lengths.
    pub rest: TriangleMesh,

    /// X components of vertex velocities.
    pub vel_x: Vec<f32>,
    /// Y components of vertex velocities.
    pub vel_y: Vec<f32>,
    /// Z components of vertex velocities.
    pub vel_z: Vec<f32>,

    /// Per-vertex lumped mass (kg).
    pub mass: Vec<f32>,
    /// Per-vertex pin flag. Pinned vertices never move.
    pub pinned: Vec<bool>,

    /// Material parameters for this cloth.
    pub material: MaterialParams,
}

impl ClothState {
    /// Builds cloth state from its configuration.
    ///
    /// Mass is lumped per vertex: each triangle contributes one third of
    /// `area * density` to each of its corners.
    pub fn from_config(config: &ClothConfig) -> WeftResult<Self> {
        let mesh = config.mesh.build()?;
        let n = mesh.vertex_count();

        let mut mass = vec![0.0f32; n];
        for t in 0..mesh.triangle_count() {
            let share = mesh.triangle_area(t) * config.material.density / 3.0;
            for &v in &mesh.triangle(t) {
                mass[v as usize] += share;
            }
        }

        let mut pinned = vec![false; n];
        for &p in &config.pinned {
            if p >= n {
                return Err(WeftError::InvalidConfig(format!(
                    "pinned vertex {p} out of bounds (vertex count {n})"
                )));
            }
            pinned[p] = true;
        }

        Ok(Self {
            rest: mesh.clone(),
            mesh,
            vel_x: vec![0.0; n],
            vel_y: vec![0.0; n],
            vel_z: vec![0.0; n],
            mass,
            pinned,
            material: config.material.clone(),
        })
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    /// Velocity of vertex `i`.
    #[inline]
    pub fn velocity(&self, i: usize) -> Vec3 {
        Vec3::new(self.vel_x[i], self.vel_y[i], self.vel_z[i])
    }

    /// Sets the velocity of vertex `i`.
    #[inline]
    pub fn set_velocity(&mut self, i: usize, v: Vec3) {
        self.vel_x[i] = v.x;
        self.vel_y[i] = v.y;
        self.vel_z[i] = v.z;
    }

    /// Flattens positions and velocities into a checkpoint snapshot.
    pub fn snapshot(&self) -> ClothSnapshot {
        let n = self.vertex_count();
        let mut positions = Vec::with_capacity(n * 3);
        let mut velocities = Vec::with_capacity(n * 3);
        for i in 0..n {
            positions.push(self.mesh.pos_x[i]);
            positions.push(self.mesh.pos_y[i]);
            positions.push(self.mesh.pos_z[i]);
            velocities.push(self.vel_x[i]);
            velocities.push(self.vel_y[i]);
            velocities.push(self.vel_z[i]);
        }
        ClothSnapshot {
            positions,
            velocities,
        }
    }

    /// Restores positions and velocities from a checkpoint snapshot.
    pub fn restore(&mut self, snapshot: &ClothSnapshot) -> WeftResult<()> {
        let n = self.vertex_count();
        if snapshot.positions.len() != n * 3 || snapshot.velocities.len() != n * 3 {
            return Err(WeftError::Serialization(format!(
                "checkpoint cloth size mismatch: {} positions for {} vertices",
                snapshot.positions.len(),
                n
            )));
        }
        for i in 0..n {
            self.mesh.pos_x[i] = snapshot.positions[i * 3];
            self.mesh.pos_y[i] = snapshot.positions[i * 3 + 1];
            self.mesh.pos_z[i] = snapshot.positions[i * 3 + 2];
            self.vel_x[i] = snapshot.velocities[i * 3];
            self.vel_y[i] = snapshot.velocities[i * 3 + 1];
            self.vel_z[i] = snapshot.velocities[i * 3 + 2];
        }
        Ok(())
    }
}

/// The complete mutable state of a running simulation.
pub struct SimulationContext {
    /// Simulated time in seconds. Monotonically non-decreasing.
    pub time: f64,
    /// Frame counter. Increments once per `frame_steps` steps.
    pub frame: u32,
    /// Step counter. Increments once per integration call.
    pub step: u32,

    /// Duration of one frame in seconds.
    pub frame_time: f64,
    /// Integration steps per frame.
    pub frame_steps: u32,
    /// Save interval in steps.
    pub save_every: u32,
    /// Simulated end time.
    pub end_time: f64,
    /// Final frame index.
    pub end_frame: u32,

    /// Gravity acceleration.
    pub gravity: Vec3,

    /// Cloth pieces, in scene order.
    pub cloths: Vec<ClothState>,
    /// Obstacle definitions.
    pub obstacles: Vec<Obstacle>,
    /// Obstacle meshes at the current time. Derived, never persisted.
    pub obstacle_meshes: Vec<TriangleMesh>,

    /// Per-module cumulative timers.
    pub timers: ModuleTimers,
}

impl SimulationContext {
    /// Builds a fresh context (time 0) from a scene configuration.
    pub fn from_scene(config: &SceneConfig) -> WeftResult<Self> {
        let cloths = config
            .cloths
            .iter()
            .map(ClothState::from_config)
            .collect::<WeftResult<Vec<_>>>()?;

        let obstacles = config
            .obstacles
            .iter()
            .map(|o| {
                Ok(Obstacle {
                    base: o.mesh.build()?,
                    motion: o.motion.clone(),
                })
            })
            .collect::<WeftResult<Vec<_>>>()?;

        let mut ctx = Self {
            time: 0.0,
            frame: 0,
            step: 0,
            frame_time: config.frame_time,
            frame_steps: config.frame_steps,
            save_every: config.save_every,
            end_time: config.end_time,
            end_frame: config.end_frame,
            gravity: Vec3::from_array(config.gravity),
            cloths,
            obstacles,
            obstacle_meshes: Vec::new(),
            timers: ModuleTimers::default(),
        };
        ctx.update_obstacles();
        Ok(ctx)
    }

    /// Time advanced by one integration step.
    #[inline]
    pub fn step_time(&self) -> f64 {
        self.frame_time / self.frame_steps as f64
    }

    /// Advances the step counter and time, rolling the frame counter on
    /// the frame boundary. Called by the integrator at the end of each
    /// step.
    pub fn advance_clock(&mut self) {
        self.step += 1;
        self.time += self.step_time();
        if self.step % self.frame_steps == 0 {
            self.frame += 1;
        }
    }

    /// True when the current step sits on a frame boundary.
    #[inline]
    pub fn at_frame_boundary(&self) -> bool {
        self.step % self.frame_steps == 0
    }

    /// True when the current step should be checkpointed.
    #[inline]
    pub fn at_save_boundary(&self) -> bool {
        self.at_frame_boundary() && self.step % self.save_every == 0
    }

    /// True once an end condition (time or frame) is reached.
    #[inline]
    pub fn finished(&self) -> bool {
        self.time >= self.end_time || self.frame >= self.end_frame
    }

    /// Recomputes obstacle meshes at the current time.
    pub fn update_obstacles(&mut self) {
        self.obstacle_meshes = self
            .obstacles
            .iter()
            .map(|o| o.mesh_at(self.time))
            .collect();
    }

    /// Captures a checkpoint of the current state.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            frame: self.frame,
            step: self.step,
            time: self.time,
            cloths: self.cloths.iter().map(ClothState::snapshot).collect(),
        }
    }

    /// Restores cloth state from a checkpoint.
    ///
    /// Counters and time are *not* taken from the checkpoint — the driver
    /// recomputes them from the resume frame — but the checkpoint's frame
    /// must match the requested one.
    pub fn restore(&mut self, checkpoint: &Checkpoint) -> WeftResult<()> {
        if checkpoint.frame != self.frame {
            return Err(WeftError::Serialization(format!(
                "checkpoint is for frame {}, expected {}",
                checkpoint.frame, self.frame
            )));
        }
        if checkpoint.cloths.len() != self.cloths.len() {
            return Err(WeftError::Serialization(format!(
                "checkpoint has {} cloths, scene has {}",
                checkpoint.cloths.len(),
                self.cloths.len()
            )));
        }
        for (cloth, snapshot) in self.cloths.iter_mut().zip(&checkpoint.cloths) {
            cloth.restore(snapshot)?;
        }
        Ok(())
    }
}
