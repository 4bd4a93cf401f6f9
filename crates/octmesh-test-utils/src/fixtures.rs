//! Reusable refinement predicates.
//!
//! - [`UniformLevel`]: every cell down to one level.
//! - [`PointRefine`]: refine the cells containing a point.
//! - [`SphereShell`]: refine the cells cut by a sphere surface.
//! - [`SeededRandom`]: deterministic pseudo-random refinement.

use octmesh_tree::{Cell, RefinementPredicate};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Refines every cell to the same level.
#[derive(Clone, Copy, Debug)]
pub struct UniformLevel(pub u32);

impl RefinementPredicate for UniformLevel {
    fn desired_level(&self, _cell: &Cell) -> u32 {
        self.0
    }
}

/// Refines the cells whose closed box contains `point`.
#[derive(Clone, Copy, Debug)]
pub struct PointRefine {
    pub point: [f64; 3],
    pub level: u32,
}

impl PointRefine {
    pub fn new(point: [f64; 3], level: u32) -> Self {
        Self { point, level }
    }
}

impl RefinementPredicate for PointRefine {
    fn desired_level(&self, cell: &Cell) -> u32 {
        if cell.contains(self.point) {
            self.level
        } else {
            0
        }
    }
}

/// Refines the cells that the sphere surface passes through.
///
/// In 2-D the sphere is a circle in the z = 0 plane.
#[derive(Clone, Copy, Debug)]
pub struct SphereShell {
    pub center: [f64; 3],
    pub radius: f64,
    pub level: u32,
}

impl SphereShell {
    pub fn new(center: [f64; 3], radius: f64, level: u32) -> Self {
        Self {
            center,
            radius,
            level,
        }
    }
}

impl RefinementPredicate for SphereShell {
    fn desired_level(&self, cell: &Cell) -> u32 {
        let (lo, hi) = (cell.lo(), cell.hi());
        let mut near = 0.0;
        let mut far = 0.0;
        for a in 0..3 {
            let (l, h, c) = (lo[a] as f64, hi[a] as f64, self.center[a]);
            let d_near = (l - c).max(0.0).max(c - h);
            let d_far = (c - l).abs().max((h - c).abs());
            near += d_near * d_near;
            far += d_far * d_far;
        }
        let r2 = self.radius * self.radius;
        if near <= r2 && r2 <= far {
            self.level
        } else {
            0
        }
    }
}

/// Splits each cell with probability `percent / 100`, up to `max_level`.
///
/// The decision is a pure function of the seed and the cell's spatial key,
/// so rebuilding with the same seed reproduces the same mesh.
#[derive(Clone, Copy, Debug)]
pub struct SeededRandom {
    pub seed: u64,
    pub percent: u64,
    pub max_level: u32,
}

impl SeededRandom {
    pub fn new(seed: u64, percent: u64, max_level: u32) -> Self {
        Self {
            seed,
            percent,
            max_level,
        }
    }
}

impl RefinementPredicate for SeededRandom {
    fn desired_level(&self, cell: &Cell) -> u32 {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed ^ cell.key().0.rotate_left(17));
        let roll = rng.next_u64() % 100;
        if cell.level() < self.max_level && roll < self.percent {
            cell.level() + 1
        } else {
            cell.level()
        }
    }
}
