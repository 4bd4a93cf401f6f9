//! Tree configuration and validation.

use octmesh_core::{ConfigError, Dimension};

/// Deepest supported refinement level.
///
/// The domain spans `2 << max_level` lattice units per axis, and the spatial
/// key holds 21 bits per axis, so level 19 is the last one whose coordinates
/// all fit.
pub const MAX_LEVEL: u32 = 19;

/// Shape of a mesh: dimension and refinement depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    /// Quadtree or octree. Default: 2-D.
    pub dimension: Dimension,
    /// No cell is subdivided beyond this level. Default: 4.
    pub max_level: u32,
}

impl TreeConfig {
    /// Default dimension.
    pub const DEFAULT_DIMENSION: Dimension = Dimension::Two;
    /// Default maximum level.
    pub const DEFAULT_MAX_LEVEL: u32 = 4;

    /// Create a configuration.
    pub fn new(dimension: Dimension, max_level: u32) -> Self {
        Self {
            dimension,
            max_level,
        }
    }

    /// Check that every coordinate the tree can produce fits the spatial key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_level > MAX_LEVEL {
            return Err(ConfigError::LevelTooDeep {
                max_level: self.max_level,
                limit: MAX_LEVEL,
            });
        }
        Ok(())
    }

    /// Domain size `[nx, ny, nz]`.
    ///
    /// `nx = ny = 2 << max_level`; `nz` matches in 3-D and is 0 in 2-D. The
    /// finest cells are two units wide, so every midpoint and face centroid
    /// lands on the integer lattice.
    pub fn extent(&self) -> [i64; 3] {
        let n = 2i64 << self.max_level;
        match self.dimension {
            Dimension::Two => [n, n, 0],
            Dimension::Three => [n, n, n],
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSION, Self::DEFAULT_MAX_LEVEL)
    }
}
