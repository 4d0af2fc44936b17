//! Integration tests for the simulation driver: the full
//! initialize → relax → run cycle, the checkpoint/export layout, and
//! deterministic resume.

use std::path::{Path, PathBuf};

use weft_io::{layout, load_checkpoint};
use weft_sim::driver::Phase;
use weft_sim::{DriverOptions, OutputFormat, SimulationDriver};
use weft_types::Module;

fn scene_json(end_frame: u32) -> String {
    format!(
        r#"{{
            "frame_time": 0.02,
            "frame_steps": 10,
            "save_every": 10,
            "end_frame": {end_frame},
            "cloths": [{{
                "mesh": {{ "grid": {{ "cols": 3, "rows": 3, "width": 0.3, "height": 0.3 }} }},
                "material": {{ "density": 0.2, "stretch_stiffness": 200.0, "damping": 0.2 }},
                "pinned": [0, 1, 2, 3]
            }}],
            "obstacles": [{{
                "mesh": {{ "grid": {{ "cols": 1, "rows": 1, "width": 1.0, "height": 1.0 }} }},
                "motion": {{ "linear": {{ "velocity": [0.0, 0.0, 0.1] }} }}
            }}]
        }}"#
    )
}

/// Writes a scene file into `dir` and returns (scene path, output dir).
fn setup(dir: &Path, end_frame: u32) -> (PathBuf, PathBuf) {
    let scene = dir.join("scene.json");
    std::fs::write(&scene, scene_json(end_frame)).unwrap();
    (scene, dir.join("out"))
}

/// Runs a fresh simulation to completion.
fn run_fresh(scene: &Path, out: &Path, options: DriverOptions) -> weft_sim::Completion {
    let mut driver = SimulationDriver::start(scene, Some(out), options).unwrap();
    driver.relax().unwrap();
    driver.run().unwrap()
}

#[test]
fn scenario_two_frames_saves_exactly_three_checkpoints() {
    let dir = tempfile::tempdir().unwrap();
    let (scene, out) = setup(dir.path(), 2);

    let mut driver =
        SimulationDriver::start(&scene, Some(&out), DriverOptions::default()).unwrap();
    assert_eq!(driver.phase(), Phase::Initializing);
    driver.relax().unwrap();
    assert_eq!(driver.phase(), Phase::Running);
    let completion = driver.run().unwrap();
    assert_eq!(driver.phase(), Phase::Terminated);

    assert_eq!(completion.frame, 2);
    assert_eq!(completion.step, 20);
    assert!((completion.time - 0.04).abs() < 1e-9);

    // Checkpoints at exactly frames 0, 1, 2
    for frame in 0..=2 {
        assert!(
            layout::checkpoint_path(&out, frame).exists(),
            "missing checkpoint for frame {frame}"
        );
    }
    assert!(!layout::checkpoint_path(&out, 3).exists());

    // Checkpoint contents carry the right counters
    let cp = load_checkpoint(&layout::checkpoint_path(&out, 2)).unwrap();
    assert_eq!(cp.frame, 2);
    assert_eq!(cp.step, 20);

    // Persisted layout
    assert!(layout::conf_path(&out).exists());
    assert!(layout::obstacle_base_path(&out, 0).exists());
    assert!(out.join("cloth0_frame0.obj").exists());
    assert!(out.join("cloth0_frame2.obj").exists());
    assert!(out.join("obstacle0_frame1.obj").exists());
}

#[test]
fn timing_log_one_line_per_running_save() {
    let dir = tempfile::tempdir().unwrap();
    let (scene, out) = setup(dir.path(), 2);
    run_fresh(&scene, &out, DriverOptions::default());

    // Frame 0 is saved during relaxation without a timing line;
    // the running loop logs frames 1 and 2.
    let timing = std::fs::read_to_string(layout::timing_path(&out)).unwrap();
    let lines: Vec<&str> = timing.lines().collect();
    assert_eq!(lines.len(), 2);

    for line in lines {
        let deltas: Vec<f64> = line
            .split_whitespace()
            .map(|t| t.parse().unwrap())
            .collect();
        assert_eq!(deltas.len(), Module::COUNT);
        assert!(deltas.iter().all(|d| *d >= 0.0), "negative delta in {line:?}");
    }
}

#[test]
fn obstacle_export_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let (scene, out) = setup(dir.path(), 1);
    run_fresh(
        &scene,
        &out,
        DriverOptions {
            export_obstacles: false,
            format: OutputFormat::Raw,
        },
    );

    // Base meshes are still exported at start; per-frame OBJs are not
    assert!(layout::obstacle_base_path(&out, 0).exists());
    assert!(!out.join("obstacle0_frame0.obj").exists());
    assert!(!out.join("obstacle0_frame1.obj").exists());
    assert!(out.join("cloth0_frame1.obj").exists());
}

#[test]
fn compute_only_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (scene, _) = setup(dir.path(), 1);

    let mut driver = SimulationDriver::start(&scene, None, DriverOptions::default()).unwrap();
    driver.relax().unwrap();
    let completion = driver.run().unwrap();
    assert_eq!(completion.frame, 1);

    // Only the scene file itself exists
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["scene.json".to_string()]);
}

#[test]
fn resume_restores_counters_from_frame() {
    let dir = tempfile::tempdir().unwrap();
    let (scene, out) = setup(dir.path(), 4);
    run_fresh(&scene, &out, DriverOptions::default());

    let driver = SimulationDriver::resume(&out, 2, DriverOptions::default()).unwrap();
    assert_eq!(driver.phase(), Phase::Running);

    let ctx = driver.context();
    assert_eq!(ctx.frame, 2);
    assert_eq!(ctx.step, 20);
    assert!((ctx.time - 0.04).abs() < 1e-12);
}

#[test]
fn resume_reproduces_uninterrupted_run() {
    let dir = tempfile::tempdir().unwrap();
    let (scene, out) = setup(dir.path(), 4);
    run_fresh(&scene, &out, DriverOptions::default());

    // Reference final state from the uninterrupted run
    let reference = load_checkpoint(&layout::checkpoint_path(&out, 4)).unwrap();

    // Resume from frame 2 and run to the end; frame 4 is rewritten
    let mut driver = SimulationDriver::resume(&out, 2, DriverOptions::default()).unwrap();
    let completion = driver.run().unwrap();
    assert_eq!(completion.frame, 4);

    let resumed = load_checkpoint(&layout::checkpoint_path(&out, 4)).unwrap();
    assert_eq!(resumed.step, reference.step);
    assert!((resumed.time - reference.time).abs() < 1e-9);

    assert_eq!(resumed.cloths.len(), reference.cloths.len());
    for (a, b) in resumed.cloths.iter().zip(&reference.cloths) {
        assert_eq!(a.positions.len(), b.positions.len());
        for (p, q) in a.positions.iter().zip(&b.positions) {
            assert!((p - q).abs() < 1e-5, "position diverged: {p} vs {q}");
        }
        for (p, q) in a.velocities.iter().zip(&b.velocities) {
            assert!((p - q).abs() < 1e-5, "velocity diverged: {p} vs {q}");
        }
    }
}

#[test]
fn resume_from_missing_checkpoint_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (scene, out) = setup(dir.path(), 2);
    run_fresh(&scene, &out, DriverOptions::default());

    assert!(SimulationDriver::resume(&out, 9, DriverOptions::default()).is_err());
}

#[test]
fn resume_from_empty_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(SimulationDriver::resume(dir.path(), 0, DriverOptions::default()).is_err());
}

#[test]
fn raw_output_run_completes() {
    let dir = tempfile::tempdir().unwrap();
    let (scene, out) = setup(dir.path(), 1);
    let completion = run_fresh(
        &scene,
        &out,
        DriverOptions {
            export_obstacles: true,
            format: OutputFormat::Raw,
        },
    );
    assert_eq!(completion.frame, 1);
}

#[test]
fn start_with_bad_scene_fails_before_any_stepping() {
    let dir = tempfile::tempdir().unwrap();
    let scene = dir.path().join("scene.json");
    std::fs::write(&scene, "{ not json").unwrap();

    let out = dir.path().join("out");
    assert!(SimulationDriver::start(&scene, Some(&out), DriverOptions::default()).is_err());
    // The output directory may exist, but holds no checkpoints
    assert!(!layout::checkpoint_path(&out, 0).exists());
}
