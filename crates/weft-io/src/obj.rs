//! Wavefront OBJ mesh export.
//!
//! Human-inspectable interchange output written next to each binary
//! checkpoint. Positions only; OBJ face indices are 1-based.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use weft_mesh::TriangleMesh;
use weft_types::WeftResult;

/// Writes `mesh` to `path` in OBJ format.
pub fn save_obj(mesh: &TriangleMesh, path: &Path) -> WeftResult<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    for i in 0..mesh.vertex_count() {
        writeln!(
            out,
            "v {} {} {}",
            mesh.pos_x[i], mesh.pos_y[i], mesh.pos_z[i]
        )?;
    }
    for t in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(t);
        writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }

    out.flush()?;
    Ok(())
}
