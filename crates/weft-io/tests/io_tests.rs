//! Integration tests for weft-io.

use std::path::Path;

use weft_io::{layout, load_checkpoint, save_checkpoint, Checkpoint, ClothSnapshot};
use weft_mesh::generators::cloth_grid;

fn sample_checkpoint() -> Checkpoint {
    Checkpoint {
        frame: 3,
        step: 24,
        time: 0.12,
        cloths: vec![ClothSnapshot {
            positions: vec![0.0, 1.0, 2.0, 0.25, -1.5, 3.5],
            velocities: vec![0.0; 6],
        }],
    }
}

#[test]
fn checkpoint_round_trip_is_bit_exact() {
    let dir = tempfile::tempdir().unwrap();
    let path = layout::checkpoint_path(dir.path(), 3);

    let original = sample_checkpoint();
    save_checkpoint(&original, &path).unwrap();
    let loaded = load_checkpoint(&path).unwrap();

    assert_eq!(loaded, original);
    // f32 payloads must survive with identical bits
    for (a, b) in loaded.cloths[0]
        .positions
        .iter()
        .zip(&original.cloths[0].positions)
    {
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn checkpoint_write_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = layout::checkpoint_path(dir.path(), 0);
    save_checkpoint(&sample_checkpoint(), &path).unwrap();

    let entries: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["00000".to_string()]);
}

#[test]
fn load_missing_checkpoint_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_checkpoint(&layout::checkpoint_path(dir.path(), 7)).is_err());
}

#[test]
fn load_corrupt_checkpoint_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = layout::checkpoint_path(dir.path(), 1);
    std::fs::write(&path, b"not a checkpoint").unwrap();
    assert!(load_checkpoint(&path).is_err());
}

#[test]
fn layout_paths() {
    let out = Path::new("/tmp/run");
    assert_eq!(
        layout::checkpoint_path(out, 42),
        Path::new("/tmp/run/00042")
    );
    assert_eq!(
        layout::checkpoint_path(out, 99999),
        Path::new("/tmp/run/99999")
    );
    assert_eq!(layout::conf_path(out), Path::new("/tmp/run/conf.json"));
    assert_eq!(
        layout::cloth_obj_path(out, 1, 7),
        Path::new("/tmp/run/cloth1_frame7.obj")
    );
    assert_eq!(
        layout::obstacle_obj_path(out, 0, 3),
        Path::new("/tmp/run/obstacle0_frame3.obj")
    );
    assert_eq!(
        layout::obstacle_base_path(out, 2),
        Path::new("/tmp/run/obs/obs2.obj")
    );
    assert_eq!(layout::timing_path(out), Path::new("/tmp/run/timing"));
}

#[test]
fn obj_export_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mesh.obj");

    let mesh = cloth_grid(1, 1, 2.0, 2.0);
    weft_io::obj::save_obj(&mesh, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    let vertex_lines = lines.iter().filter(|l| l.starts_with("v ")).count();
    let face_lines = lines.iter().filter(|l| l.starts_with("f ")).count();
    assert_eq!(vertex_lines, mesh.vertex_count());
    assert_eq!(face_lines, mesh.triangle_count());

    // Faces are 1-based
    for line in lines.iter().filter(|l| l.starts_with("f ")) {
        for idx in line[2..].split_whitespace() {
            assert!(idx.parse::<usize>().unwrap() >= 1);
        }
    }
}
