//! Integration tests for weft-sim: configuration, context invariants,
//! integrator behavior, strain diagnostics, and status reporting.

use weft_mesh::generators::cloth_grid;
use weft_sim::config::SceneConfig;
use weft_sim::integrator::{ImplicitSpringIntegrator, Integrator};
use weft_sim::obstacle::{Motion, Obstacle};
use weft_sim::report::{OutputFormat, StatusReporter};
use weft_sim::state::SimulationContext;
use weft_sim::strain::analyze_cloth;
use weft_sim::timer::Timer;

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

fn scene_config(end_frame: u32) -> SceneConfig {
    let config: SceneConfig = serde_json::from_str(&scene_json(end_frame)).unwrap();
    config.validate().unwrap();
    config
}

// ─── Configuration Tests ──────────────────────────────────────

#[test]
fn config_parses_with_defaults() {
    let json = r#"{
        "frame_time": 0.04,
        "frame_steps": 8,
        "cloths": [{ "mesh": { "grid": { "cols": 2, "rows": 2, "width": 1.0, "height": 1.0 } } }]
    }"#;
    let config: SceneConfig = serde_json::from_str(json).unwrap();
    config.validate().unwrap();

    assert_eq!(config.save_every, 1);
    assert_eq!(config.end_frame, u32::MAX);
    assert!(config.end_time.is_infinite());
    assert_eq!(config.gravity[1], -weft_types::constants::GRAVITY);
    assert!((config.step_time() - 0.005).abs() < 1e-12);
    assert!(config.obstacles.is_empty());
}

#[test]
fn config_rejects_zero_frame_steps() {
    let json = r#"{
        "frame_time": 0.04,
        "frame_steps": 0,
        "cloths": [{ "mesh": { "grid": { "cols": 2, "rows": 2, "width": 1.0, "height": 1.0 } } }]
    }"#;
    let config: SceneConfig = serde_json::from_str(json).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn config_rejects_empty_scene() {
    let json = r#"{ "frame_time": 0.04, "frame_steps": 8, "cloths": [] }"#;
    let config: SceneConfig = serde_json::from_str(json).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn config_rejects_bad_material() {
    let json = r#"{
        "frame_time": 0.04,
        "frame_steps": 8,
        "cloths": [{
            "mesh": { "grid": { "cols": 2, "rows": 2, "width": 1.0, "height": 1.0 } },
            "material": { "density": -1.0, "stretch_stiffness": 100.0, "damping": 0.1 }
        }]
    }"#;
    let config: SceneConfig = serde_json::from_str(json).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn context_rejects_out_of_bounds_pin() {
    let json = r#"{
        "frame_time": 0.04,
        "frame_steps": 8,
        "cloths": [{
            "mesh": { "grid": { "cols": 1, "rows": 1, "width": 1.0, "height": 1.0 } },
            "pinned": [400]
        }]
    }"#;
    let config: SceneConfig = serde_json::from_str(json).unwrap();
    assert!(SimulationContext::from_scene(&config).is_err());
}

// ─── Context Invariant Tests ──────────────────────────────────

#[test]
fn clock_keeps_step_frame_invariant() {
    let config = scene_config(1000);
    let mut ctx = SimulationContext::from_scene(&config).unwrap();

    for _ in 0..35 {
        ctx.advance_clock();
        assert_eq!(ctx.frame, ctx.step / ctx.frame_steps);
        let on_boundary = ctx.step % ctx.frame_steps == 0 && ctx.step % ctx.save_every == 0;
        assert_eq!(ctx.at_save_boundary(), on_boundary);
    }

    assert_eq!(ctx.step, 35);
    assert_eq!(ctx.frame, 3);
    assert!((ctx.time - 35.0 * 0.002).abs() < 1e-9);
}

#[test]
fn end_conditions_terminate() {
    let config = scene_config(2);
    let mut ctx = SimulationContext::from_scene(&config).unwrap();
    assert!(!ctx.finished());
    for _ in 0..20 {
        ctx.advance_clock();
    }
    assert_eq!(ctx.frame, 2);
    assert!(ctx.finished());
}

#[test]
fn lumped_mass_sums_to_cloth_mass() {
    let config = scene_config(1);
    let ctx = SimulationContext::from_scene(&config).unwrap();
    let cloth = &ctx.cloths[0];

    // Total lumped mass = area * density
    let expected = cloth.rest.total_area() * cloth.material.density;
    let total: f32 = cloth.mass.iter().sum();
    assert!((total - expected).abs() < 1e-5);
}

// ─── Obstacle Tests ───────────────────────────────────────────

#[test]
fn static_obstacle_never_moves() {
    let obstacle = Obstacle {
        base: cloth_grid(1, 1, 1.0, 1.0),
        motion: Motion::Static,
    };
    let m = obstacle.mesh_at(5.0);
    assert_eq!(m.pos_z, obstacle.base.pos_z);
}

#[test]
fn linear_obstacle_translates_with_time() {
    let obstacle = Obstacle {
        base: cloth_grid(1, 1, 1.0, 1.0),
        motion: Motion::Linear {
            velocity: [0.0, 0.0, 0.5],
        },
    };
    let m = obstacle.mesh_at(2.0);
    for (z, base_z) in m.pos_z.iter().zip(&obstacle.base.pos_z) {
        assert!((z - base_z - 1.0).abs() < 1e-6);
    }
}

#[test]
fn obstacle_meshes_recompute_from_time() {
    let config = scene_config(1);
    let mut ctx = SimulationContext::from_scene(&config).unwrap();

    ctx.time = 3.0;
    ctx.update_obstacles();

    let expected = ctx.obstacles[0].mesh_at(3.0);
    assert_eq!(ctx.obstacle_meshes[0].pos_z, expected.pos_z);
}

// ─── Integrator Tests ─────────────────────────────────────────

#[test]
fn hanging_cloth_falls_but_pins_hold() {
    let config = scene_config(100);
    let mut ctx = SimulationContext::from_scene(&config).unwrap();
    let mut integrator = ImplicitSpringIntegrator::new();

    let pinned_before = ctx.cloths[0].mesh.position(0);
    let free_index = ctx.cloths[0].vertex_count() - 1;
    let free_before = ctx.cloths[0].mesh.position(free_index);

    for _ in 0..10 {
        integrator.advance_step(&mut ctx).unwrap();
    }

    let cloth = &ctx.cloths[0];
    assert_eq!(cloth.mesh.position(0), pinned_before);
    assert!(cloth.mesh.position(free_index).y < free_before.y);

    for i in 0..cloth.vertex_count() {
        assert!(cloth.mesh.position(i).is_finite());
        assert!(cloth.velocity(i).is_finite());
    }

    assert_eq!(ctx.step, 10);
    assert_eq!(ctx.frame, 1);
}

#[test]
fn relaxation_does_not_advance_clock() {
    let config = scene_config(100);
    let mut ctx = SimulationContext::from_scene(&config).unwrap();
    let mut integrator = ImplicitSpringIntegrator::new();

    integrator.relax_initial_state(&mut ctx).unwrap();

    assert_eq!(ctx.step, 0);
    assert_eq!(ctx.frame, 0);
    assert_eq!(ctx.time, 0.0);
    // Relaxation leaves velocities zeroed
    assert!(ctx.cloths[0].vel_y.iter().all(|&v| v == 0.0));
}

#[test]
fn integration_is_deterministic() {
    let config = scene_config(100);

    let run = || {
        let mut ctx = SimulationContext::from_scene(&config).unwrap();
        let mut integrator = ImplicitSpringIntegrator::new();
        for _ in 0..5 {
            integrator.advance_step(&mut ctx).unwrap();
        }
        ctx.cloths[0].mesh.pos_y.clone()
    };

    let a = run();
    let b = run();
    for (p, q) in a.iter().zip(&b) {
        assert!((p - q).abs() < 1e-6);
    }
}

// ─── Strain Diagnostic Tests ──────────────────────────────────

#[test]
fn strain_at_rest_is_unity() {
    let mesh = cloth_grid(2, 2, 1.0, 1.0);
    let report = analyze_cloth(&mesh, &mesh).unwrap();
    assert!((report.max_stretch - 1.0).abs() < 1e-6);
    assert!(report.max_strain < 1e-6);
}

#[test]
fn strain_detects_uniaxial_stretch() {
    let rest = cloth_grid(2, 2, 1.0, 1.0);
    let mut stretched = rest.clone();
    for x in &mut stretched.pos_x {
        *x *= 2.0;
    }

    let report = analyze_cloth(&rest, &stretched).unwrap();
    // Principal stretch 2 along X; Green strain (2² − 1)/2 = 1.5
    assert!((report.max_stretch - 2.0).abs() < 1e-4);
    assert!((report.max_strain - 1.5).abs() < 1e-4);
}

// ─── Timer Tests ──────────────────────────────────────────────

#[test]
fn timer_accumulates() {
    let mut t = Timer::default();
    assert_eq!(t.total(), 0.0);

    t.tick();
    std::thread::sleep(std::time::Duration::from_millis(2));
    t.tock();
    let first = t.total();
    assert!(first > 0.0);

    t.tick();
    t.tock();
    assert!(t.total() >= first);
}

#[test]
fn unmatched_tock_is_noop() {
    let mut t = Timer::default();
    t.tock();
    assert_eq!(t.total(), 0.0);
}

// ─── Reporter Tests ───────────────────────────────────────────

#[test]
fn reporter_structured_lines() {
    let r = StatusReporter::new(OutputFormat::Structured);
    assert!(r.is_structured());
    assert_eq!(
        r.render_status("SAVE_START", Some("frame=3")),
        r#"{"status":"SAVE_START","details":"frame=3"}"#
    );
    assert_eq!(
        r.render_status("INIT_RELAX_START", None),
        r#"{"status":"INIT_RELAX_START"}"#
    );
    assert_eq!(
        r.render_progress(2, 20, 0.5),
        r#"{"frame":2,"step":20,"time":0.5}"#
    );
    assert_eq!(
        r.render_saved("cloth0", 2, "out/cloth0_frame2.obj").unwrap(),
        r#"{"saved":"cloth0","frame":2,"file":"out/cloth0_frame2.obj"}"#
    );
}

#[test]
fn reporter_raw_lines() {
    let r = StatusReporter::new(OutputFormat::Raw);
    assert!(!r.is_structured());
    assert_eq!(r.render_status("SAVE_START", Some("frame=3")), "SAVE_START: frame=3");
    assert_eq!(r.render_status("SIMULATION_COMPLETE", None), "SIMULATION_COMPLETE");
    assert_eq!(r.render_progress(2, 20, 0.5), "Sim frame 2 [20]");
    assert!(r.render_saved("cloth0", 2, "file").is_none());
}
