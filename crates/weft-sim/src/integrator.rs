//! Time integration.
//!
//! [`Integrator`] is the seam between the driver and the physics that
//! advances cloth state: the driver never assembles matrices itself, it
//! only asks the integrator to move the world forward one step.
//!
//! [`ImplicitSpringIntegrator`] is the reference implementation: implicit
//! Euler over an edge-spring network. Each step it assembles the SPD
//! system `(M + h·C + h²·K) Δv = h·f − h²·K·v` as a block-sparse matrix of
//! 3×3 tensors and solves it through [`weft_math::linear_solve`]. The
//! spring Jacobian is approximated by the PSD part `k·d̂d̂ᵀ` per edge, which
//! keeps the system positive definite for any positive masses.

use weft_math::{linear_solve, BlockSparseMatrix, Mat3, Vec3};
use weft_types::{Module, WeftResult};

use crate::state::{ClothState, SimulationContext};

/// Effective mass assigned to pinned vertices. Large enough that the
/// solve leaves them numerically immobile; their velocity is zeroed
/// exactly after each solve.
const PIN_MASS: f32 = 1.0e9;

/// Edge lengths below this are treated as degenerate and skipped.
const MIN_EDGE_LENGTH: f32 = 1.0e-8;

/// Number of damped pseudo-steps in the initial relaxation pass.
const RELAX_PASSES: u32 = 10;

/// The time-integration seam.
///
/// Implementations mutate the context by exactly one integration step per
/// `advance_step` call, incrementing the step counter and advancing time
/// through [`SimulationContext::advance_clock`].
pub trait Integrator {
    /// Advances the simulation by one step.
    fn advance_step(&mut self, ctx: &mut SimulationContext) -> WeftResult<()>;

    /// Settles the initial state before dynamics begin, without advancing
    /// the clock. Skipped on resume.
    fn relax_initial_state(&mut self, ctx: &mut SimulationContext) -> WeftResult<()>;

    /// Returns the integrator's name.
    fn name(&self) -> &str;
}

/// A unique spring edge with its rest length.
#[derive(Debug, Clone, Copy)]
struct Edge {
    i: usize,
    j: usize,
    rest_len: f32,
}

/// Implicit-Euler edge-spring integrator.
pub struct ImplicitSpringIntegrator {
    /// Per-cloth spring edges, derived once from topology.
    edges: Vec<Vec<Edge>>,
}

impl ImplicitSpringIntegrator {
    /// Creates a new integrator. Spring edges are derived from cloth
    /// topology on first use.
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    /// Extracts the unique edges of a cloth, rest lengths from the rest
    /// mesh. Deterministic order (sorted by vertex pair).
    fn build_edges(cloth: &ClothState) -> Vec<Edge> {
        let mesh = &cloth.rest;
        let mut pairs: Vec<(usize, usize)> = Vec::with_capacity(mesh.triangle_count() * 3);
        for t in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle(t);
            let (a, b, c) = (a as usize, b as usize, c as usize);
            pairs.push((a.min(b), a.max(b)));
            pairs.push((b.min(c), b.max(c)));
            pairs.push((a.min(c), a.max(c)));
        }
        pairs.sort_unstable();
        pairs.dedup();

        pairs
            .into_iter()
            .map(|(i, j)| Edge {
                i,
                j,
                rest_len: (mesh.position(i) - mesh.position(j)).length(),
            })
            .collect()
    }

    fn ensure_edges(&mut self, ctx: &SimulationContext) {
        if self.edges.len() != ctx.cloths.len() {
            self.edges = ctx.cloths.iter().map(Self::build_edges).collect();
        }
    }

    /// Advances one cloth by one implicit step of size `h`.
    ///
    /// With `K = Σ_e k·d̂d̂ᵀ` (PSD) and `C = c·I`, solves
    /// `(M + h·C + h²·K) Δv = h·f(x, v) − h²·K·v`, then updates
    /// `v += Δv` and `x += h·v`.
    fn step_cloth(cloth: &mut ClothState, edges: &[Edge], h: f32, gravity: Vec3) -> WeftResult<()> {
        let n = cloth.vertex_count();
        let k = cloth.material.stretch_stiffness;
        let c = cloth.material.damping;
        let h2 = h * h;

        let mut system = BlockSparseMatrix::<Mat3>::new(n);
        let mut force = vec![Vec3::ZERO; n];
        let mut stiffness_v = vec![Vec3::ZERO; n];

        // Mass, damping Jacobian, gravity, velocity damping
        for i in 0..n {
            let m = if cloth.pinned[i] { PIN_MASS } else { cloth.mass[i] };
            system.add_block(i, i, Mat3::from_diagonal(Vec3::splat(m + h * c)));
            if !cloth.pinned[i] {
                force[i] += m * gravity - c * cloth.velocity(i);
            }
        }

        // Springs: force, PSD Jacobian blocks, and K·v
        for edge in edges {
            let (i, j) = (edge.i, edge.j);
            let d = cloth.mesh.position(i) - cloth.mesh.position(j);
            let len = d.length();
            if len < MIN_EDGE_LENGTH {
                continue;
            }
            let dir = d / len;

            let f = k * (len - edge.rest_len) * dir;
            force[i] -= f;
            force[j] += f;

            // w = k·d̂d̂ᵀ, scattered with the usual Laplacian signs
            let w = Mat3::from_cols(dir * (k * dir.x), dir * (k * dir.y), dir * (k * dir.z));
            system.add_block(i, i, w * h2);
            system.add_block(j, j, w * h2);
            system.add_block(i, j, w * -h2);
            system.add_block(j, i, w * -h2);

            let dv = cloth.velocity(i) - cloth.velocity(j);
            let w_dv = w * dv;
            stiffness_v[i] += w_dv;
            stiffness_v[j] -= w_dv;
        }

        let rhs: Vec<Vec3> = (0..n)
            .map(|i| {
                if cloth.pinned[i] {
                    Vec3::ZERO
                } else {
                    h * force[i] - h2 * stiffness_v[i]
                }
            })
            .collect();

        let delta_v = linear_solve(&system, &rhs)?;

        for i in 0..n {
            if cloth.pinned[i] {
                cloth.set_velocity(i, Vec3::ZERO);
                continue;
            }
            let v = cloth.velocity(i) + delta_v[i];
            cloth.set_velocity(i, v);
            let p = cloth.mesh.position(i) + h * v;
            cloth.mesh.set_position(i, p);
        }

        Ok(())
    }
}

impl Default for ImplicitSpringIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Integrator for ImplicitSpringIntegrator {
    fn advance_step(&mut self, ctx: &mut SimulationContext) -> WeftResult<()> {
        self.ensure_edges(ctx);
        let h = ctx.step_time() as f32;
        let gravity = ctx.gravity;

        ctx.timers.tick(Module::Integration);
        for (cloth, edges) in ctx.cloths.iter_mut().zip(&self.edges) {
            Self::step_cloth(cloth, edges, h, gravity)?;
        }
        ctx.timers.tock(Module::Integration);

        ctx.advance_clock();
        ctx.update_obstacles();

        tracing::trace!(step = ctx.step, time = ctx.time, "integration step complete");
        Ok(())
    }

    fn relax_initial_state(&mut self, ctx: &mut SimulationContext) -> WeftResult<()> {
        self.ensure_edges(ctx);
        let h = ctx.step_time() as f32;

        ctx.timers.tick(Module::Integration);
        for pass in 0..RELAX_PASSES {
            for (cloth, edges) in ctx.cloths.iter_mut().zip(&self.edges) {
                // Gravity off, velocities discarded between passes: pure
                // settling toward spring rest lengths.
                Self::step_cloth(cloth, edges, h, Vec3::ZERO)?;
                cloth.vel_x.fill(0.0);
                cloth.vel_y.fill(0.0);
                cloth.vel_z.fill(0.0);
            }
            tracing::trace!(pass, "relaxation pass complete");
        }
        ctx.timers.tock(Module::Integration);

        Ok(())
    }

    fn name(&self) -> &str {
        "ImplicitSprings"
    }
}
