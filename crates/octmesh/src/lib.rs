//! octmesh: balanced adaptive quadtree/octree meshes.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the octmesh sub-crates. For most users, adding `octmesh` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use octmesh::prelude::*;
//!
//! // Refine a 2-D mesh down to level 4 around the point (3, 5).
//! let near = |cell: &Cell| if cell.contains([3.0, 5.0, 0.0]) { 4 } else { 0 };
//! let mesh = octmesh::build(2, 4, &near).unwrap();
//!
//! let leaf = mesh.containing_cell(3.0, 5.0, 0.0).unwrap();
//! assert_eq!(mesh.cell(leaf).unwrap().level(), 4);
//! assert!(mesh.is_numbered());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `octmesh-core` | Handles, spatial key, axes and directions, errors |
//! | [`registry`] | `octmesh-registry` | Nodes, edges, faces, and their registries |
//! | [`tree`] | `octmesh-tree` | Tree construction, queries, and configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Handles, spatial keys, geometry primitives, and errors (`octmesh-core`).
pub use octmesh_core as types;

/// Shared geometric entities and their deduplicating registries
/// (`octmesh-registry`).
pub use octmesh_registry as registry;

/// Tree construction, balancing, hanging resolution, and indexing
/// (`octmesh-tree`).
pub use octmesh_tree as tree;

use octmesh_core::{Dimension, MeshError};
use octmesh_tree::{RefinementPredicate, Tree, TreeConfig};

/// Build a complete mesh over `[0, 2 << max_level]` in `n_dim` dimensions.
///
/// Shorthand for [`Tree::build`] with a [`TreeConfig`] made from the
/// arguments. `n_dim` must be 2 or 3.
pub fn build(
    n_dim: usize,
    max_level: u32,
    predicate: &dyn RefinementPredicate,
) -> Result<Tree, MeshError> {
    let dimension = Dimension::try_from(n_dim)?;
    Tree::build(TreeConfig::new(dimension, max_level), predicate)
}

/// Common imports for typical octmesh usage.
///
/// ```rust
/// use octmesh::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use octmesh_core::{
        Axis, CellId, ConfigError, Dimension, Direction, EdgeId, FaceId, MeshError, NodeId,
        SpatialKey,
    };

    // Entities
    pub use octmesh_registry::{Edge, Face, Node};

    // Tree
    pub use octmesh_tree::{Cell, MeshStats, RefinementPredicate, Tree, TreeConfig};
}
