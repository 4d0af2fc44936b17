//! CLI command implementations.

use std::path::Path;

use weft_sim::{DriverOptions, OutputFormat, SimulationDriver};
use weft_types::WeftResult;

fn options(no_export_obstacles: bool, raw_output: bool) -> DriverOptions {
    DriverOptions {
        export_obstacles: !no_export_obstacles,
        format: if raw_output {
            OutputFormat::Raw
        } else {
            OutputFormat::Structured
        },
    }
}

/// Run a simulation from a scene file until its end condition.
pub fn simulate(
    scene: &Path,
    out_dir: Option<&Path>,
    no_export_obstacles: bool,
    raw_output: bool,
) -> WeftResult<()> {
    let mut driver =
        SimulationDriver::start(scene, out_dir, options(no_export_obstacles, raw_output))?;
    driver.relax()?;
    driver.run()?;
    Ok(())
}

/// Resume a previous run from a checkpointed frame.
pub fn resume(
    out_dir: &Path,
    frame: u32,
    no_export_obstacles: bool,
    raw_output: bool,
) -> WeftResult<()> {
    let mut driver =
        SimulationDriver::resume(out_dir, frame, options(no_export_obstacles, raw_output))?;
    driver.run()?;
    Ok(())
}
