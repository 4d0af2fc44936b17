//! The resumable offline simulation driver.
//!
//! A driver moves through the phases
//! `Initializing → Relaxing → Running → Terminated`, one-directional,
//! with `Running` self-looping once per integration step:
//!
//! - [`SimulationDriver::start`] begins a fresh run: loads the scene,
//!   establishes the output directory (config copy, obstacle base meshes,
//!   truncated timing log), and leaves the driver in `Initializing`.
//! - [`SimulationDriver::relax`] separates obstacles, settles the initial
//!   state, optionally writes the frame-0 checkpoint, and enters `Running`.
//! - [`SimulationDriver::resume`] reconstructs a run from a checkpoint:
//!   counters and time are recomputed from the resume frame
//!   (`step = frame·frame_steps`, `time = frame·frame_time`), obstacle
//!   meshes are recomputed from that time, cloth state is restored from
//!   the checkpoint, and relaxation is skipped entirely — the checkpoint
//!   already encodes a physically valid state. Enters `Running` directly.
//! - [`SimulationDriver::run`] loops steps until an end condition is
//!   reached and returns a [`Completion`] — the driver never exits the
//!   process; the CLI decides exit status at its top-level dispatch.
//!
//! Checkpoint export writes the binary snapshot, one OBJ per cloth, and
//! (unless disabled) one OBJ per obstacle. Partial writes are not rolled
//! back: a failure mid-export propagates and terminates the run, and a
//! later resume does not attempt detection or repair.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use weft_io::layout;
use weft_io::{load_checkpoint, save_checkpoint};
use weft_types::{constants, Module, WeftResult};

use crate::config::SceneConfig;
use crate::integrator::{ImplicitSpringIntegrator, Integrator};
use crate::report::{OutputFormat, StatusReporter};
use crate::separation::{NoopSeparator, Separator};
use crate::state::SimulationContext;
use crate::strain;

/// Steps between lightweight progress heartbeats in structured mode.
const HEARTBEAT_STEPS: u32 = 10;

/// Driver phase. Transitions are one-directional; `Running` self-loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Scene loaded, output location established.
    Initializing,
    /// Initial separation/relaxation in progress.
    Relaxing,
    /// Stepping.
    Running,
    /// An end condition was reached.
    Terminated,
}

/// Options shared by fresh and resumed runs.
#[derive(Debug, Clone, Copy)]
pub struct DriverOptions {
    /// Export per-frame obstacle OBJs alongside cloth OBJs.
    pub export_obstacles: bool,
    /// Wire format of the status stream.
    pub format: OutputFormat,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            export_obstacles: true,
            format: OutputFormat::Structured,
        }
    }
}

/// Final state of a completed run.
#[derive(Debug, Clone, Copy)]
pub struct Completion {
    /// Simulated time at termination.
    pub time: f64,
    /// Frame counter at termination.
    pub frame: u32,
    /// Step counter at termination.
    pub step: u32,
}

/// Orchestrates initialization, stepping, checkpoint/export, and resume.
pub struct SimulationDriver {
    ctx: SimulationContext,
    phase: Phase,
    out_dir: Option<PathBuf>,
    export_obstacles: bool,
    reporter: StatusReporter,
    integrator: Box<dyn Integrator>,
    separator: Box<dyn Separator>,
    timing: Option<File>,
    /// Timer totals at the previous timing-log line.
    last_module_totals: [f64; Module::COUNT],
}

impl SimulationDriver {
    /// Starts a fresh run from a scene file.
    ///
    /// With an output directory: creates it if missing (creation failure is
    /// fatal), copies the scene config to `conf.json`, exports obstacle
    /// base meshes under `obs/`, and truncates the timing log. Without one
    /// the run is compute-only: no checkpoints, no exports.
    pub fn start(
        scene_path: &Path,
        out_dir: Option<&Path>,
        options: DriverOptions,
    ) -> WeftResult<Self> {
        let reporter = StatusReporter::new(options.format);
        reporter.status(
            "CONFIG",
            Some(&format!(
                "scene={}, output_dir={}, export_obstacles={}",
                scene_path.display(),
                out_dir.map_or("none".to_string(), |p| p.display().to_string()),
                options.export_obstacles
            )),
        );

        if let Some(out) = out_dir {
            if !out.exists() {
                fs::create_dir_all(out)?;
                reporter.status("DIRECTORY_CREATED", Some(&out.display().to_string()));
            }
        }

        reporter.status("INIT_PHYSICS_START", Some(&scene_path.display().to_string()));

        let config = SceneConfig::load(scene_path)?;
        let ctx = SimulationContext::from_scene(&config)?;

        let mut timing = None;
        if let Some(out) = out_dir {
            fs::copy(scene_path, layout::conf_path(out))?;

            let obs_dir = layout::obstacle_base_dir(out);
            fs::create_dir_all(&obs_dir)?;
            for (o, obstacle) in ctx.obstacles.iter().enumerate() {
                weft_io::obj::save_obj(&obstacle.base, &layout::obstacle_base_path(out, o))?;
            }

            timing = Some(File::create(layout::timing_path(out))?);
        }

        reporter.status("INIT_PHYSICS_COMPLETE", None);

        Ok(Self {
            ctx,
            phase: Phase::Initializing,
            out_dir: out_dir.map(Path::to_path_buf),
            export_obstacles: options.export_obstacles,
            reporter,
            integrator: Box::new(ImplicitSpringIntegrator::new()),
            separator: Box::new(NoopSeparator),
            timing,
            last_module_totals: [0.0; Module::COUNT],
        })
    }

    /// Resumes an interrupted run from `frame` of a previous run's output
    /// directory.
    ///
    /// The persistence step of a fresh start is skipped (the files already
    /// exist; the timing log is opened in append mode). Counters and time
    /// are recomputed from the resume frame, obstacle meshes are recomputed
    /// from that time, and cloth state is loaded from the frame's
    /// checkpoint. Relaxation is not repeated.
    pub fn resume(out_dir: &Path, frame: u32, options: DriverOptions) -> WeftResult<Self> {
        let reporter = StatusReporter::new(options.format);
        reporter.status(
            "CONFIG",
            Some(&format!(
                "output_dir={}, resume_frame={}, export_obstacles={}",
                out_dir.display(),
                frame,
                options.export_obstacles
            )),
        );
        reporter.status("RESUME_START", Some(&format!("from_frame={frame}")));

        let conf = layout::conf_path(out_dir);
        reporter.status("INIT_PHYSICS_START", Some(&conf.display().to_string()));
        let config = SceneConfig::load(&conf)?;
        let mut ctx = SimulationContext::from_scene(&config)?;
        reporter.status("INIT_PHYSICS_COMPLETE", None);

        ctx.frame = frame;
        ctx.step = frame * ctx.frame_steps;
        ctx.time = frame as f64 * ctx.frame_time;
        ctx.update_obstacles();

        let checkpoint = load_checkpoint(&layout::checkpoint_path(out_dir, frame))?;
        ctx.restore(&checkpoint)?;

        let timing = Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(layout::timing_path(out_dir))?,
        );

        reporter.status("RESUME_COMPLETE", Some(&format!("time={}", ctx.time)));

        Ok(Self {
            ctx,
            phase: Phase::Running,
            out_dir: Some(out_dir.to_path_buf()),
            export_obstacles: options.export_obstacles,
            reporter,
            integrator: Box::new(ImplicitSpringIntegrator::new()),
            separator: Box::new(NoopSeparator),
            timing,
            last_module_totals: [0.0; Module::COUNT],
        })
    }

    /// Replaces the integrator (the default is [`ImplicitSpringIntegrator`]).
    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.integrator = integrator;
        self
    }

    /// Replaces the separator (the default is a no-op).
    pub fn with_separator(mut self, separator: Box<dyn Separator>) -> Self {
        self.separator = separator;
        self
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The simulation context (read-only; the driver owns mutation).
    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    /// Separates obstacles, settles the initial state, and writes the
    /// frame-0 checkpoint when output is enabled. Fresh runs only.
    ///
    /// # Panics
    ///
    /// Panics when called in any phase other than `Initializing` — the
    /// phase sequence is a caller contract.
    pub fn relax(&mut self) -> WeftResult<()> {
        assert_eq!(
            self.phase,
            Phase::Initializing,
            "relax() requires phase Initializing, driver is in {:?}",
            self.phase
        );
        self.phase = Phase::Relaxing;

        self.reporter.status("INIT_RELAX_START", None);

        self.ctx.timers.tick(Module::Collision);
        self.separator.separate(&mut self.ctx)?;
        self.ctx.timers.tock(Module::Collision);

        self.integrator.relax_initial_state(&mut self.ctx)?;

        self.reporter.status("INIT_RELAX_COMPLETE", None);

        if self.out_dir.is_some() {
            self.save(self.ctx.frame)?;
        }

        self.phase = Phase::Running;
        Ok(())
    }

    /// Runs until an end condition (`time >= end_time` or
    /// `frame >= end_frame`) is reached.
    ///
    /// On a step failure the error is reported on the status stream and
    /// propagated — there is no in-process recovery; resilience is
    /// re-invoking the driver against the last checkpoint.
    ///
    /// # Panics
    ///
    /// Panics when called in any phase other than `Running`.
    pub fn run(&mut self) -> WeftResult<Completion> {
        assert_eq!(
            self.phase,
            Phase::Running,
            "run() requires phase Running, driver is in {:?}",
            self.phase
        );

        self.reporter.status(
            "SIMULATION_START",
            Some(&format!(
                "end_time={}, end_frame={}",
                self.ctx.end_time, self.ctx.end_frame
            )),
        );

        loop {
            if let Err(e) = self.sim_step() {
                self.reporter.status("ERROR", Some(&e.to_string()));
                return Err(e);
            }

            if self.ctx.finished() {
                self.reporter.status(
                    "SIMULATION_COMPLETE",
                    Some(&format!(
                        "time={}, frames={}",
                        self.ctx.time, self.ctx.frame
                    )),
                );
                self.phase = Phase::Terminated;
                return Ok(Completion {
                    time: self.ctx.time,
                    frame: self.ctx.frame,
                    step: self.ctx.step,
                });
            }
        }
    }

    /// One `Running` self-loop iteration: advance a step, then either a
    /// full save (frame boundary ∧ save interval) or a heartbeat.
    fn sim_step(&mut self) -> WeftResult<()> {
        self.integrator.advance_step(&mut self.ctx)?;

        if self.ctx.at_save_boundary() {
            self.reporter
                .progress(self.ctx.frame, self.ctx.step, self.ctx.time);
            self.save(self.ctx.frame)?;
            self.save_timings()?;
        } else if self.reporter.is_structured() && self.ctx.step % HEARTBEAT_STEPS == 0 {
            // Lightweight heartbeat between save boundaries
            self.reporter
                .progress(self.ctx.frame, self.ctx.step, self.ctx.time);
        }

        Ok(())
    }

    /// Exports the current state: binary checkpoint, one OBJ per cloth,
    /// and one OBJ per obstacle unless disabled.
    ///
    /// No-op without an output directory, and for frames at or beyond
    /// [`constants::MAX_EXPORT_FRAME`] (bounds checkpoint filename width).
    fn save(&mut self, frame: u32) -> WeftResult<()> {
        let out = match &self.out_dir {
            Some(out) => out.clone(),
            None => return Ok(()),
        };
        if frame >= constants::MAX_EXPORT_FRAME {
            return Ok(());
        }

        self.reporter
            .status("SAVE_START", Some(&format!("frame={frame}")));

        self.ctx.timers.tick(Module::StrainAnalysis);
        let mut max_stretch = 0.0f64;
        for cloth in &self.ctx.cloths {
            let report = strain::analyze_cloth(&cloth.rest, &cloth.mesh)?;
            max_stretch = max_stretch.max(report.max_stretch);
        }
        self.ctx.timers.tock(Module::StrainAnalysis);

        self.ctx.timers.tick(Module::Export);

        let checkpoint = self.ctx.checkpoint();
        save_checkpoint(&checkpoint, &layout::checkpoint_path(&out, frame))?;

        for (c, cloth) in self.ctx.cloths.iter().enumerate() {
            let path = layout::cloth_obj_path(&out, c, frame);
            weft_io::obj::save_obj(&cloth.mesh, &path)?;
            self.reporter
                .saved(&format!("cloth{c}"), frame, &path.display().to_string());
        }

        if self.export_obstacles {
            for (o, mesh) in self.ctx.obstacle_meshes.iter().enumerate() {
                let path = layout::obstacle_obj_path(&out, o, frame);
                weft_io::obj::save_obj(mesh, &path)?;
                self.reporter
                    .saved(&format!("obstacle{o}"), frame, &path.display().to_string());
            }
        }

        self.ctx.timers.tock(Module::Export);

        tracing::debug!(frame, max_stretch, "frame exported");
        self.reporter.status(
            "SAVE_COMPLETE",
            Some(&format!("frame={frame}, max_stretch={max_stretch:.4}")),
        );
        Ok(())
    }

    /// Appends one line of per-module timer deltas (cumulative minus the
    /// previous snapshot) to the timing log, if one is open.
    fn save_timings(&mut self) -> WeftResult<()> {
        let file = match &mut self.timing {
            Some(file) => file,
            None => return Ok(()),
        };

        let totals = self.ctx.timers.totals();
        let mut line = String::new();
        for (total, last) in totals.iter().zip(&self.last_module_totals) {
            line.push_str(&format!("{} ", total - last));
        }
        line.push('\n');
        file.write_all(line.as_bytes())?;

        self.last_module_totals = totals;
        Ok(())
    }
}
