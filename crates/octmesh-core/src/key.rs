//! Integer spatial key used to deduplicate mesh entities by location.
//!
//! The key is a Morton (Z-order) interleave of the three coordinates, 21
//! bits per axis. Within `[0, MAX_COORD]` on every axis the mapping is a
//! bijection, so equal locations always produce equal keys and distinct
//! locations never collide. Every coordinate produced by a tree whose
//! `max_level` passes config validation lies in that range.

use crate::geometry::Location;
use std::fmt;

/// Largest coordinate value representable on each axis.
pub const MAX_COORD: i64 = (1 << 21) - 1;

/// Morton-interleaved key for an integer location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpatialKey(pub u64);

impl SpatialKey {
    /// Compute the key of a location.
    ///
    /// Coordinates must lie in `[0, MAX_COORD]`.
    pub fn of(loc: Location) -> Self {
        debug_assert!(
            loc.iter().all(|&c| (0..=MAX_COORD).contains(&c)),
            "location {loc:?} outside the keyable range [0, {MAX_COORD}]"
        );
        let x = spread(loc[0] as u64);
        let y = spread(loc[1] as u64);
        let z = spread(loc[2] as u64);
        Self(x | (y << 1) | (z << 2))
    }

    /// Recover the location this key was computed from.
    pub fn location(self) -> Location {
        [
            compact(self.0) as i64,
            compact(self.0 >> 1) as i64,
            compact(self.0 >> 2) as i64,
        ]
    }
}

impl fmt::Display for SpatialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.location();
        write!(f, "key({x},{y},{z})")
    }
}

/// Insert two zero bits between each of the low 21 bits of `v`.
fn spread(v: u64) -> u64 {
    let mut x = v & 0x1f_ffff;
    x = (x | (x << 32)) & 0x001f_0000_0000_ffff;
    x = (x | (x << 16)) & 0x001f_0000_ff00_00ff;
    x = (x | (x << 8)) & 0x100f_00f0_0f00_f00f;
    x = (x | (x << 4)) & 0x10c3_0c30_c30c_30c3;
    x = (x | (x << 2)) & 0x1249_2492_4924_9249;
    x
}

/// Inverse of [`spread`].
fn compact(v: u64) -> u64 {
    let mut x = v & 0x1249_2492_4924_9249;
    x = (x ^ (x >> 2)) & 0x10c3_0c30_c30c_30c3;
    x = (x ^ (x >> 4)) & 0x100f_00f0_0f00_f00f;
    x = (x ^ (x >> 8)) & 0x001f_0000_ff00_00ff;
    x = (x ^ (x >> 16)) & 0x001f_0000_0000_ffff;
    x = (x ^ (x >> 32)) & 0x1f_ffff;
    x
}
