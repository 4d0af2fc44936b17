//! Per-triangle strain and stretch diagnostics.
//!
//! For each triangle the deformation gradient `F = Ds·Dm⁻¹` (3×2: current
//! edge matrix times inverse rest-edge matrix in a local 2D frame) is
//! decomposed two ways:
//!
//! - `svd(F)` — singular values are the principal stretch ratios
//! - eigenvalues of the Green strain `E = ½(FᵀF − I)` — principal strains
//!
//! Reported at each checkpoint as an aggregate over all triangles.

use weft_math::{eigendecompose, svd, DenseMatrix, Vec3};
use weft_mesh::TriangleMesh;
use weft_types::{constants, WeftResult};

/// Aggregate strain metrics for one cloth.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrainReport {
    /// Largest principal stretch ratio over all triangles (1.0 = rest).
    pub max_stretch: f64,
    /// Largest absolute principal Green strain over all triangles.
    pub max_strain: f64,
}

/// Rest-edge matrix of a triangle in a local orthonormal 2D frame,
/// returned as column-major [dm00, dm10, dm01, dm11]. `None` for
/// degenerate triangles.
fn rest_edge_matrix(p0: Vec3, p1: Vec3, p2: Vec3) -> Option<[f32; 4]> {
    let e1 = p1 - p0;
    let e2 = p2 - p0;
    let normal = e1.cross(e2);
    if normal.length_squared() < constants::DEGENERATE_AREA_THRESHOLD {
        return None;
    }
    let u = e1.normalize();
    let w = normal.normalize().cross(u);
    // e1·w = 0 by construction
    Some([e1.length(), 0.0, e2.dot(u), e2.dot(w)])
}

/// Inverts a column-major 2×2 matrix. `None` when singular.
fn invert_2x2(m: [f32; 4]) -> Option<[f32; 4]> {
    let det = m[0] * m[3] - m[2] * m[1];
    if det.abs() < constants::DEGENERATE_AREA_THRESHOLD {
        return None;
    }
    let inv = 1.0 / det;
    Some([m[3] * inv, -m[1] * inv, -m[2] * inv, m[0] * inv])
}

/// Analyzes one cloth: rest mesh versus current mesh.
///
/// Degenerate triangles (zero rest area) are skipped.
pub fn analyze_cloth(rest: &TriangleMesh, current: &TriangleMesh) -> WeftResult<StrainReport> {
    let mut report = StrainReport::default();

    for t in 0..rest.triangle_count() {
        let [a, b, c] = rest.triangle(t);
        let (a, b, c) = (a as usize, b as usize, c as usize);

        let dm = match rest_edge_matrix(rest.position(a), rest.position(b), rest.position(c)) {
            Some(dm) => dm,
            None => continue,
        };
        let dm_inv = match invert_2x2(dm) {
            Some(inv) => inv,
            None => continue,
        };

        let d1 = current.position(b) - current.position(a);
        let d2 = current.position(c) - current.position(a);

        // F = Ds·Dm⁻¹, column h of F = d1·dm_inv[0h] + d2·dm_inv[1h]
        let f_col0 = d1 * dm_inv[0] + d2 * dm_inv[1];
        let f_col1 = d1 * dm_inv[2] + d2 * dm_inv[3];
        let f = DenseMatrix::from_fn(3, 2, |i, j| {
            let col = if j == 0 { f_col0 } else { f_col1 };
            col[i] as f64
        });

        // Principal stretches from the thin SVD of the 3×2 gradient
        let decomposition = svd(&f)?;
        for &s in &decomposition.singular_values {
            report.max_stretch = report.max_stretch.max(s);
        }

        // Principal strains from the Green tensor E = ½(FᵀF − I)
        let ftf = f.transpose().mul(&f);
        let green = DenseMatrix::from_fn(2, 2, |i, j| {
            0.5 * (ftf.get(i, j) - if i == j { 1.0 } else { 0.0 })
        });
        let eig = eigendecompose(&green, false)?;
        for &lambda in &eig.values {
            report.max_strain = report.max_strain.max(lambda.abs());
        }
    }

    Ok(report)
}
