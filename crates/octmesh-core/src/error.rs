//! Error types for mesh construction and queries.
//!
//! The build pipeline has no recoverable-error taxonomy in the usual sense:
//! a valid configuration and a total predicate always produce a mesh. The
//! variants here surface caller mistakes (bad configuration, out-of-domain
//! queries, foreign handles) and topology-invariant violations that must
//! fail fast instead of propagating a dangling reference.

use crate::geometry::Direction;
use crate::id::CellId;
use std::error::Error;
use std::fmt;

/// Errors detected while validating a tree configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Only 2-D and 3-D meshes are supported.
    UnsupportedDimension {
        /// The requested number of dimensions.
        ndim: usize,
    },
    /// `max_level` would push coordinates beyond the spatial key range.
    LevelTooDeep {
        /// The requested maximum level.
        max_level: u32,
        /// The deepest supported level.
        limit: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedDimension { ndim } => {
                write!(f, "unsupported dimension {ndim}, expected 2 or 3")
            }
            Self::LevelTooDeep { max_level, limit } => {
                write!(f, "max_level {max_level} exceeds the supported limit {limit}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Errors from building or querying a mesh.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshError {
    /// The tree configuration failed validation.
    InvalidConfig(ConfigError),
    /// A point query fell outside the root cell.
    OutOfDomain {
        /// The queried point.
        point: [f64; 3],
        /// Upper corner of the domain; the lower corner is the origin.
        extent: [i64; 3],
    },
    /// A lookup that the mesh topology guarantees should succeed found
    /// nothing. Indicates broken deduplication or broken balance.
    TopologyViolation {
        /// What was expected and not found.
        reason: String,
    },
    /// A cell handle that does not belong to this tree.
    UnknownCell {
        /// The offending handle.
        cell: CellId,
    },
    /// A neighbor query hit the domain boundary.
    MissingNeighbor {
        /// The cell whose neighbor was requested.
        cell: CellId,
        /// The direction that has no neighbor.
        direction: Direction,
    },
    /// A query needed a refined neighbor but found a leaf.
    NeighborNotRefined {
        /// The cell whose neighbor was inspected.
        cell: CellId,
        /// The direction of the unrefined neighbor.
        direction: Direction,
    },
    /// An operation ran before the pipeline stage it depends on.
    StageNotReached {
        /// The stage that must complete first.
        required: &'static str,
    },
    /// The mesh skeleton has been derived; the tree can no longer be refined.
    Sealed,
    /// The operation is only defined for two-dimensional meshes.
    PlanarOnly {
        /// Name of the rejected operation.
        operation: &'static str,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(e) => write!(f, "invalid config: {e}"),
            Self::OutOfDomain { point, extent } => {
                write!(f, "point {point:?} is outside the domain [0, {extent:?}]")
            }
            Self::TopologyViolation { reason } => {
                write!(f, "mesh topology violated: {reason}")
            }
            Self::UnknownCell { cell } => write!(f, "unknown cell {cell}"),
            Self::MissingNeighbor { cell, direction } => {
                write!(f, "cell {cell} has no neighbor in direction {direction}")
            }
            Self::NeighborNotRefined { cell, direction } => {
                write!(
                    f,
                    "neighbor of cell {cell} in direction {direction} is not refined"
                )
            }
            Self::StageNotReached { required } => {
                write!(f, "pipeline stage '{required}' has not run yet")
            }
            Self::Sealed => write!(f, "mesh is sealed against further refinement"),
            Self::PlanarOnly { operation } => {
                write!(f, "{operation} is only defined for 2-D meshes")
            }
        }
    }
}

impl Error for MeshError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for MeshError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e)
    }
}
