//! Integration tests for weft-mesh.

use weft_math::Vec3;
use weft_mesh::generators::cloth_grid;
use weft_mesh::TriangleMesh;

#[test]
fn grid_counts() {
    let mesh = cloth_grid(2, 2, 1.0, 1.0);
    assert_eq!(mesh.vertex_count(), 9); // 3×3 vertices
    assert_eq!(mesh.triangle_count(), 8); // 2×2 quads × 2 tris each
    mesh.validate().unwrap();
}

#[test]
fn grid_spans_centered_extents() {
    let mesh = cloth_grid(4, 2, 2.0, 1.0);
    let min_x = mesh.pos_x.iter().cloned().fold(f32::INFINITY, f32::min);
    let max_x = mesh.pos_x.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    assert!((min_x + 1.0).abs() < 1e-6);
    assert!((max_x - 1.0).abs() < 1e-6);
}

#[test]
fn grid_area_matches_dimensions() {
    let mesh = cloth_grid(8, 8, 2.0, 0.5);
    assert!((mesh.total_area() - 1.0).abs() < 1e-4);
}

#[test]
fn translate_moves_all_vertices() {
    let mut mesh = cloth_grid(1, 1, 1.0, 1.0);
    let before = mesh.position(0);
    mesh.translate(Vec3::new(1.0, 2.0, 3.0));
    let after = mesh.position(0);
    assert!((after - before - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
}

#[test]
fn validate_rejects_soa_mismatch() {
    let mut mesh = cloth_grid(1, 1, 1.0, 1.0);
    mesh.pos_y.pop();
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_rejects_out_of_bounds_index() {
    let mut mesh = cloth_grid(1, 1, 1.0, 1.0);
    mesh.indices[0] = 99;
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_rejects_partial_triangle() {
    let mut mesh = cloth_grid(1, 1, 1.0, 1.0);
    mesh.indices.pop();
    assert!(mesh.validate().is_err());
}

#[test]
fn mesh_serde_round_trip() {
    let mesh = cloth_grid(2, 3, 1.0, 1.5);
    let json = serde_json::to_string(&mesh).unwrap();
    let back: TriangleMesh = serde_json::from_str(&json).unwrap();
    assert_eq!(back.pos_x, mesh.pos_x);
    assert_eq!(back.indices, mesh.indices);
}
