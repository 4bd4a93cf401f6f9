//! Balanced adaptive quadtree/octree meshes.
//!
//! A [`Tree`] starts as one square (or cube) cell and is refined by a
//! [`RefinementPredicate`]. Subdivision keeps face-adjacent leaves within
//! one level of each other, deduplicates the corner nodes, edges, and faces
//! that neighboring cells share, links the *hanging* entities that appear
//! where a fine leaf meets a coarse one, and finally numbers everything
//! for use as degrees of freedom.
//!
//! ```
//! use octmesh_tree::{Cell, Tree, TreeConfig};
//! use octmesh_core::Dimension;
//!
//! let near_origin = |c: &Cell| if c.contains([1.0, 1.0, 0.0]) { 3 } else { 0 };
//! let tree = Tree::build(TreeConfig::new(Dimension::Two, 3), &near_origin).unwrap();
//! assert!(!tree.hanging_nodes().is_empty());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod config;
mod hanging;
mod index;
mod locate;
pub mod predicate;
mod refine;
mod skeleton;
pub mod tree;

#[cfg(test)]
pub(crate) mod compliance;

pub use cell::Cell;
pub use config::{TreeConfig, MAX_LEVEL};
pub use predicate::RefinementPredicate;
pub use tree::{MeshStats, Tree};
