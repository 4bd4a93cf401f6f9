//! The full set of registries owned by one mesh.

use crate::entity::{Edge, Face, Node};
use crate::registry::Registry;
use octmesh_core::geometry::{centroid4, midpoint};
use octmesh_core::{Axis, EdgeId, FaceId, Location, NodeId, SpatialKey};

/// Node registry plus per-axis edge and per-normal face registries.
///
/// Edges are kept apart by the axis they run along and faces by their
/// normal, because an x-edge and a y-edge of the same cell size can share
/// a midpoint (and likewise faces can share a centroid).
#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    nodes: Registry<Node>,
    edges: [Registry<Edge>; 3],
    faces: [Registry<Face>; 3],
}

impl EntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Node at `location`, created if absent.
    pub fn get_or_create_node(&mut self, location: Location) -> NodeId {
        let key = SpatialKey::of(location);
        self.nodes
            .get_or_insert_with(key, || Node::new(location))
            .0
    }

    /// Edge along `axis` between nodes `a` and `b` (lower end first),
    /// created if absent.
    pub fn get_or_create_edge(&mut self, axis: Axis, a: NodeId, b: NodeId) -> EdgeId {
        let ends = [self.nodes[a].location, self.nodes[b].location];
        let key = SpatialKey::of(midpoint(ends[0], ends[1]));
        self.edges[axis.index()]
            .get_or_insert_with(key, || Edge::new(axis, [a, b], ends))
            .0
    }

    /// Face with normal `normal` and canonical corners `points`, created if
    /// absent.
    pub fn get_or_create_face(&mut self, normal: Axis, points: [NodeId; 4]) -> FaceId {
        let corners = points.map(|p| self.nodes[p].location);
        let key = SpatialKey::of(centroid4(corners));
        self.faces[normal.index()]
            .get_or_insert_with(key, || Face::new(normal, points, corners))
            .0
    }

    /// The node registry.
    pub fn nodes(&self) -> &Registry<Node> {
        &self.nodes
    }

    /// Mutable node registry.
    pub fn nodes_mut(&mut self) -> &mut Registry<Node> {
        &mut self.nodes
    }

    /// The registry of edges running along `axis`.
    pub fn edges(&self, axis: Axis) -> &Registry<Edge> {
        &self.edges[axis.index()]
    }

    /// Mutable registry of edges running along `axis`.
    pub fn edges_mut(&mut self, axis: Axis) -> &mut Registry<Edge> {
        &mut self.edges[axis.index()]
    }

    /// The registry of faces with normal `normal`.
    pub fn faces(&self, normal: Axis) -> &Registry<Face> {
        &self.faces[normal.index()]
    }

    /// Mutable registry of faces with normal `normal`.
    pub fn faces_mut(&mut self, normal: Axis) -> &mut Registry<Face> {
        &mut self.faces[normal.index()]
    }

    /// Total number of edges across all axes.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Registry::len).sum()
    }

    /// Total number of faces across all normals.
    pub fn face_count(&self) -> usize {
        self.faces.iter().map(Registry::len).sum()
    }
}
