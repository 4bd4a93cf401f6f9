//! The shared geometric entities: [`Node`], [`Edge`], and [`Face`].
//!
//! Entities are plain data. Cross-references are handles into the owning
//! [`EntityStore`](crate::EntityStore); `index` and the hanging fields are
//! filled in by the tree's post-construction passes.

use crate::registry::Handle;
use octmesh_core::geometry::{centroid4, midpoint};
use octmesh_core::{Axis, EdgeId, FaceId, Location, NodeId, SpatialKey};

/// Behavior shared by every registry-managed entity.
pub trait Entity {
    /// Handle type minted by the registry that owns this entity.
    type Id: Handle;

    /// Spatial key the entity is deduplicated under.
    fn key(&self) -> SpatialKey;

    /// Whether the entity is constrained by coarser parents.
    fn is_hanging(&self) -> bool;

    /// Assigned degree-of-freedom number.
    fn index(&self) -> u32;

    /// Assign the degree-of-freedom number.
    fn set_index(&mut self, index: u32);
}

/// A mesh vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Integer coordinates.
    pub location: Location,
    /// Spatial key of `location`.
    pub key: SpatialKey,
    /// Degree-of-freedom number (valid after indexing).
    pub index: u32,
    /// Set when the node lies on a coarser neighbor's edge or face.
    pub hanging: bool,
    /// Interpolation parents of a hanging node.
    ///
    /// A face-center node stores the four coarse face corners. An edge
    /// midpoint stores its two coarse endpoints as `[a, b, a, b]`, so a
    /// uniform average over the four slots is the linear interpolant in
    /// both cases.
    pub parents: [Option<NodeId>; 4],
}

impl Node {
    /// Create a regular (non-hanging) node.
    pub fn new(location: Location) -> Self {
        Self {
            location,
            key: SpatialKey::of(location),
            index: 0,
            hanging: false,
            parents: [None; 4],
        }
    }

    /// Number of populated parent slots.
    pub fn parent_count(&self) -> usize {
        self.parents.iter().flatten().count()
    }
}

impl Entity for Node {
    type Id = NodeId;

    fn key(&self) -> SpatialKey {
        self.key
    }

    fn is_hanging(&self) -> bool {
        self.hanging
    }

    fn index(&self) -> u32 {
        self.index
    }

    fn set_index(&mut self, index: u32) {
        self.index = index;
    }
}

/// An axis-aligned segment between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    /// Endpoints, lower coordinate first. Fixed at creation.
    pub points: [NodeId; 2],
    /// Axis the edge runs along.
    pub axis: Axis,
    /// Midpoint.
    pub location: Location,
    /// Spatial key of the midpoint.
    pub key: SpatialKey,
    /// Length along `axis`.
    pub length: i64,
    /// Number of leaf cells citing this edge.
    pub reference: u32,
    /// Set when the edge is half of a coarser edge or lies inside a
    /// coarser face.
    pub hanging: bool,
    /// Degree-of-freedom number (valid after indexing).
    pub index: u32,
    /// Coarse edges this hanging edge interpolates from.
    pub parents: [Option<EdgeId>; 2],
}

impl Edge {
    /// Create an edge from its endpoints and their locations.
    pub fn new(axis: Axis, points: [NodeId; 2], ends: [Location; 2]) -> Self {
        let location = midpoint(ends[0], ends[1]);
        let a = axis.index();
        Self {
            points,
            axis,
            location,
            key: SpatialKey::of(location),
            length: ends[1][a] - ends[0][a],
            reference: 0,
            hanging: false,
            index: 0,
            parents: [None; 2],
        }
    }
}

impl Entity for Edge {
    type Id = EdgeId;

    fn key(&self) -> SpatialKey {
        self.key
    }

    fn is_hanging(&self) -> bool {
        self.hanging
    }

    fn index(&self) -> u32 {
        self.index
    }

    fn set_index(&mut self, index: u32) {
        self.index = index;
    }
}

/// An axis-aligned quadrilateral.
///
/// Corners use the local `(u, v)` frame of the face plane, where `u` and `v`
/// are the two in-plane axes in ascending order: `points` are
/// `(0,0), (1,0), (0,1), (1,1)`. Edges follow the fixed order
/// `e0 = p0–p2`, `e1 = p2–p3`, `e2 = p1–p3`, `e3 = p0–p1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    /// Corners in canonical order.
    pub points: [NodeId; 4],
    /// Bounding edges in canonical order, linked by the skeleton pass.
    pub edges: [Option<EdgeId>; 4],
    /// Normal axis.
    pub normal: Axis,
    /// Centroid.
    pub location: Location,
    /// Spatial key of the centroid.
    pub key: SpatialKey,
    /// Area of the face.
    pub area: i64,
    /// Number of leaf cells citing this face.
    pub reference: u32,
    /// Set when the face is a quarter of a coarser neighbor's face.
    pub hanging: bool,
    /// Degree-of-freedom number (valid after indexing).
    pub index: u32,
    /// The coarse face this hanging face lies on.
    pub parent: Option<FaceId>,
}

impl Face {
    /// Create a face from its canonical corners and their locations.
    pub fn new(normal: Axis, points: [NodeId; 4], corners: [Location; 4]) -> Self {
        let location = centroid4(corners);
        let (u, v) = normal.others();
        let du = corners[1][u.index()] - corners[0][u.index()];
        let dv = corners[2][v.index()] - corners[0][v.index()];
        Self {
            points,
            edges: [None; 4],
            normal,
            location,
            key: SpatialKey::of(location),
            area: du * dv,
            reference: 0,
            hanging: false,
            index: 0,
            parent: None,
        }
    }

    /// Axis along which edge slot `slot` runs.
    ///
    /// Slots 0 and 2 run along `v`, slots 1 and 3 along `u`.
    pub fn edge_axis(&self, slot: usize) -> Axis {
        let (u, v) = self.normal.others();
        if slot % 2 == 0 {
            v
        } else {
            u
        }
    }

    /// Corner pair bounding edge slot `slot`.
    pub fn edge_corners(slot: usize) -> (usize, usize) {
        const PAIRS: [(usize, usize); 4] = [(0, 2), (2, 3), (1, 3), (0, 1)];
        PAIRS[slot % 4]
    }
}

impl Entity for Face {
    type Id = FaceId;

    fn key(&self) -> SpatialKey {
        self.key
    }

    fn is_hanging(&self) -> bool {
        self.hanging
    }

    fn index(&self) -> u32 {
        self.index
    }

    fn set_index(&mut self, index: u32) {
        self.index = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_starts_regular() {
        let n = Node::new([2, 4, 0]);
        assert_eq!(n.key, SpatialKey::of([2, 4, 0]));
        assert!(!n.hanging);
        assert_eq!(n.parent_count(), 0);
    }

    #[test]
    fn edge_measures_along_its_axis() {
        let e = Edge::new(Axis::Y, [NodeId(0), NodeId(1)], [[4, 0, 0], [4, 8, 0]]);
        assert_eq!(e.location, [4, 4, 0]);
        assert_eq!(e.length, 8);
        assert_eq!(e.key, SpatialKey::of([4, 4, 0]));
    }

    #[test]
    fn face_area_uses_in_plane_axes() {
        // x-normal face spanning y in [0, 4] and z in [0, 2]: u = y, v = z.
        let f = Face::new(
            Axis::X,
            [NodeId(0), NodeId(1), NodeId(2), NodeId(3)],
            [[6, 0, 0], [6, 4, 0], [6, 0, 2], [6, 4, 2]],
        );
        assert_eq!(f.area, 8);
        assert_eq!(f.location, [6, 2, 1]);
        assert_eq!(f.edge_axis(0), Axis::Z);
        assert_eq!(f.edge_axis(1), Axis::Y);
    }

    #[test]
    fn edge_corner_pairs_are_canonical() {
        assert_eq!(Face::edge_corners(0), (0, 2));
        assert_eq!(Face::edge_corners(1), (2, 3));
        assert_eq!(Face::edge_corners(2), (1, 3));
        assert_eq!(Face::edge_corners(3), (0, 1));
    }
}
