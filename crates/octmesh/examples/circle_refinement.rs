//! Refine a quadtree along a circle and print the resulting mesh summary.
//!
//! Run with `cargo run -p octmesh --example circle_refinement`.

use octmesh::prelude::*;

fn main() -> Result<(), MeshError> {
    let max_level = 6;
    let (cx, cy, r) = (64.0, 64.0, 40.0);

    // Refine every cell the circle passes through down to the finest level.
    let on_circle = move |cell: &Cell| {
        let (lo, hi) = (cell.lo(), cell.hi());
        let clamp = |v: f64, a: usize| v.clamp(lo[a] as f64, hi[a] as f64);
        let near = (clamp(cx, 0) - cx).hypot(clamp(cy, 1) - cy);
        let far = ((lo[0] as f64 - cx).abs().max((hi[0] as f64 - cx).abs()))
            .hypot((lo[1] as f64 - cy).abs().max((hi[1] as f64 - cy).abs()));
        if near <= r && r <= far {
            max_level
        } else {
            0
        }
    };

    let mesh = octmesh::build(2, max_level, &on_circle)?;
    println!("{}", mesh.stats());

    let probe = mesh.containing_cell(cx + r, cy, 0.0)?;
    let cell = mesh.cell(probe)?;
    println!(
        "cell on the circle at ({}, {}): level {}, size {}",
        cx + r,
        cy,
        cell.level(),
        cell.size()
    );
    Ok(())
}
