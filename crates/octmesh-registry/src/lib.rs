//! Deduplicating registries for the shared geometric entities of an
//! adaptive mesh.
//!
//! Subdivision mints corner points, edges, and faces that neighboring cells
//! share. Every such entity is created through a get-or-create call keyed
//! by its [`SpatialKey`](octmesh_core::SpatialKey), so at most one instance
//! exists per (kind, orientation, location).
//!
//! # Layout
//!
//! ```text
//! EntityStore
//! ├── nodes: Registry<Node>
//! ├── edges: [Registry<Edge>; 3]   (one per axis the edge runs along)
//! └── faces: [Registry<Face>; 3]   (one per normal axis)
//! ```
//!
//! Each [`Registry`] is an insertion-ordered map, so its position index is
//! a stable arena handle and iteration order is creation order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod entity;
pub mod registry;
pub mod store;

pub use entity::{Edge, Entity, Face, Node};
pub use registry::{Handle, Registry};
pub use store::EntityStore;
