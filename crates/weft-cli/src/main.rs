//! Weft CLI — offline cloth simulation with checkpoint/resume.
//!
//! Exit status is decided here and only here: help/usage display exits 0,
//! argument errors exit 1, runtime failures print an error and exit 1.

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "weft")]
#[command(version, about = "Weft — offline cloth simulation engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation in batch mode.
    #[command(visible_alias = "simulateoffline", alias = "simulate_offline")]
    SimulateOffline {
        /// JSON file describing the simulation setup.
        scene: PathBuf,

        /// Directory to save output in. Omit for a compute-only run.
        out_dir: Option<PathBuf>,

        /// Skip exporting obstacle OBJs.
        #[arg(long)]
        no_export_obstacles: bool,

        /// Use simple output format instead of JSON.
        #[arg(long)]
        raw_output: bool,
    },

    /// Resume an incomplete simulation in batch mode.
    #[command(visible_alias = "resumeoffline", alias = "resume_offline")]
    ResumeOffline {
        /// Directory containing simulation output files.
        out_dir: PathBuf,

        /// Frame number to resume from.
        frame: u32,

        /// Skip exporting obstacle OBJs.
        #[arg(long)]
        no_export_obstacles: bool,

        /// Use simple output format instead of JSON.
        #[arg(long)]
        raw_output: bool,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage/help/version display is a normal exit; bad arguments
            // are a failure, before any simulation state is touched.
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let result = match cli.command {
        Commands::SimulateOffline {
            scene,
            out_dir,
            no_export_obstacles,
            raw_output,
        } => commands::simulate(&scene, out_dir.as_deref(), no_export_obstacles, raw_output),
        Commands::ResumeOffline {
            out_dir,
            frame,
            no_export_obstacles,
            raw_output,
        } => commands::resume(&out_dir, frame, no_export_obstacles, raw_output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
