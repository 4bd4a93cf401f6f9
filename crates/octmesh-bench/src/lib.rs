//! Benchmark profiles for octmesh.
//!
//! - [`shell_profile_2d`]: circle-shell refinement of a level-8 quadtree
//! - [`shell_profile_3d`]: sphere-shell refinement of a level-5 octree
//! - [`probe_points`]: deterministic query points inside a domain

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use octmesh_core::Dimension;
use octmesh_test_utils::SphereShell;
use octmesh_tree::TreeConfig;

/// Level-8 quadtree (512×512) refined along a circle.
pub fn shell_profile_2d() -> (TreeConfig, SphereShell) {
    let config = TreeConfig::new(Dimension::Two, 8);
    (config, SphereShell::new([256.0, 256.0, 0.0], 150.0, 8))
}

/// Level-5 octree (64³) refined along a sphere.
pub fn shell_profile_3d() -> (TreeConfig, SphereShell) {
    let config = TreeConfig::new(Dimension::Three, 5);
    (config, SphereShell::new([32.0, 32.0, 32.0], 20.0, 5))
}

/// `count` deterministic points inside `[0, extent)` on each axis.
pub fn probe_points(count: usize, extent: [i64; 3]) -> Vec<[f64; 3]> {
    (0..count as u64)
        .map(|i| {
            let coord = |mul: u64, a: usize| {
                if extent[a] == 0 {
                    0.0
                } else {
                    (i.wrapping_mul(mul) % (extent[a] as u64 * 16)) as f64 / 16.0
                }
            };
            [
                coord(6364136223846793007, 0),
                coord(1442695040888963407, 1),
                coord(2862933555777941757, 2),
            ]
        })
        .collect()
}
