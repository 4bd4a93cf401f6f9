//! Core types for the octmesh adaptive mesh workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by every other crate: typed entity handles, the
//! integer spatial key used to deduplicate entities by location, the small
//! geometry primitives (axes, face directions, dimensions), and the error
//! types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod id;
pub mod key;

pub use error::{ConfigError, MeshError};
pub use geometry::{Axis, Dimension, Direction, Location};
pub use id::{CellId, EdgeId, FaceId, NodeId};
pub use key::SpatialKey;
