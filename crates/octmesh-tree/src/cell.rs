//! Tree cells and the canonical child layout.
//!
//! Children are numbered by octant: bit 0 selects the +x half, bit 1 the
//! +y half, bit 2 the +z half. Corners use the same bit convention, so
//! corner `j` of child `i` is the point `bits(i) + bits(j)` on the 3×3(×3)
//! lattice spanned by the parent's low corner, center and high corner.

use octmesh_core::geometry::midpoint;
use octmesh_core::{
    Axis, CellId, Dimension, Direction, EdgeId, FaceId, Location, NodeId, SpatialKey,
};
use smallvec::SmallVec;

/// A quadtree or octree cell.
///
/// Cells are owned by the tree's arena; every cross-reference is a
/// [`CellId`]. Fields are read through accessors so a refinement predicate
/// sees a consistent snapshot.
#[derive(Clone, Debug)]
pub struct Cell {
    pub(crate) id: CellId,
    pub(crate) corners: SmallVec<[NodeId; 8]>,
    pub(crate) lo: Location,
    pub(crate) hi: Location,
    pub(crate) center: Location,
    pub(crate) key: SpatialKey,
    pub(crate) level: u32,
    pub(crate) parent: Option<CellId>,
    pub(crate) children: SmallVec<[CellId; 8]>,
    pub(crate) neighbors: [Option<CellId>; 6],
    pub(crate) edges: SmallVec<[(Axis, EdgeId); 12]>,
    pub(crate) faces: SmallVec<[(Axis, FaceId); 6]>,
    pub(crate) index: u32,
}

impl Cell {
    pub(crate) fn new(
        id: CellId,
        corners: SmallVec<[NodeId; 8]>,
        lo: Location,
        hi: Location,
        level: u32,
        parent: Option<CellId>,
    ) -> Self {
        let center = midpoint(lo, hi);
        Self {
            id,
            corners,
            lo,
            hi,
            center,
            key: SpatialKey::of(center),
            level,
            parent,
            children: SmallVec::new(),
            neighbors: [None; 6],
            edges: SmallVec::new(),
            faces: SmallVec::new(),
            index: 0,
        }
    }

    /// Handle of this cell.
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Corner nodes in canonical order.
    pub fn corners(&self) -> &[NodeId] {
        &self.corners
    }

    /// Lowest corner.
    pub fn lo(&self) -> Location {
        self.lo
    }

    /// Highest corner.
    pub fn hi(&self) -> Location {
        self.hi
    }

    /// Body center.
    pub fn center(&self) -> Location {
        self.center
    }

    /// Spatial key of the center.
    pub fn key(&self) -> SpatialKey {
        self.key
    }

    /// Edge length. Cells are square (cubic).
    pub fn size(&self) -> i64 {
        self.hi[0] - self.lo[0]
    }

    /// Refinement level; the root is level 0.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// The cell this one was split from.
    pub fn parent(&self) -> Option<CellId> {
        self.parent
    }

    /// Children in octant order; empty for a leaf.
    pub fn children(&self) -> &[CellId] {
        &self.children
    }

    /// Whether the cell has not been subdivided.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Stored neighbor across the face in `direction`.
    ///
    /// The stored link may name a cell that has since been split. Use
    /// [`Tree::neighbor`](crate::Tree::neighbor) for the settled neighbor.
    pub fn neighbor(&self, direction: Direction) -> Option<CellId> {
        self.neighbors[direction.index()]
    }

    /// Edges of a leaf with their axes (after the skeleton pass).
    pub fn edges(&self) -> &[(Axis, EdgeId)] {
        &self.edges
    }

    /// Faces of a leaf with their normals (after the skeleton pass).
    pub fn faces(&self) -> &[(Axis, FaceId)] {
        &self.faces
    }

    /// Position in the leaf list (after enumeration).
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Whether the point lies in the closed box of this cell.
    ///
    /// In 2-D the z coordinate is ignored.
    pub fn contains(&self, p: [f64; 3]) -> bool {
        let ndim = if self.corners.len() == 8 { 3 } else { 2 };
        (0..ndim).all(|a| p[a] >= self.lo[a] as f64 && p[a] <= self.hi[a] as f64)
    }

    /// Child index whose half-space on every axis contains `p`.
    ///
    /// A coordinate equal to the center goes to the lower half.
    pub(crate) fn octant_of(&self, p: [f64; 3], dimension: Dimension) -> usize {
        dimension
            .axes()
            .iter()
            .filter(|a| p[a.index()] > self.center[a.index()] as f64)
            .fold(0, |acc, a| acc | (1 << a.index()))
    }
}

/// Lattice coordinate (0, 1 or 2 per axis) of corner `corner` of child
/// `child`.
pub(crate) fn lattice_point(child: usize, corner: usize) -> [usize; 3] {
    [0, 1, 2].map(|a| ((child >> a) & 1) + ((corner >> a) & 1))
}

/// Octant of the child reached by flipping `child` across `axis`.
pub(crate) fn mirror(child: usize, axis: Axis) -> usize {
    child ^ (1 << axis.index())
}

/// Whether octant `child` lies on the face of its parent in `direction`.
pub(crate) fn on_face(child: usize, direction: Direction) -> bool {
    let bit = (child >> direction.axis().index()) & 1 == 1;
    bit == direction.is_positive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_corner_lattice() {
        // Child 3 (upper-right quadrant) spans lattice (1,1)..(2,2).
        assert_eq!(lattice_point(3, 0), [1, 1, 0]);
        assert_eq!(lattice_point(3, 3), [2, 2, 0]);
        // Child 4 of an octree is the lower-left-front octant raised in z.
        assert_eq!(lattice_point(4, 0), [0, 0, 1]);
        assert_eq!(lattice_point(4, 7), [1, 1, 2]);
    }

    #[test]
    fn face_membership_and_mirroring() {
        assert!(on_face(1, Direction::PosX));
        assert!(!on_face(1, Direction::NegX));
        assert!(on_face(2, Direction::PosY));
        assert!(on_face(0, Direction::NegZ));
        assert_eq!(mirror(1, Axis::X), 0);
        assert_eq!(mirror(5, Axis::Z), 1);
    }

    fn square(lo: Location, hi: Location) -> Cell {
        let corners = SmallVec::from_slice(&[NodeId(0), NodeId(1), NodeId(2), NodeId(3)]);
        Cell::new(CellId(0), corners, lo, hi, 0, None)
    }

    #[test]
    fn octant_ties_go_low() {
        let cell = square([0, 0, 0], [4, 4, 0]);
        assert_eq!(cell.octant_of([2.0, 2.0, 0.0], Dimension::Two), 0);
        assert_eq!(cell.octant_of([2.5, 2.0, 0.0], Dimension::Two), 1);
        assert_eq!(cell.octant_of([2.0, 3.0, 9.0], Dimension::Two), 2);
    }

    #[test]
    fn contains_is_closed_and_planar() {
        let cell = square([0, 0, 0], [4, 4, 0]);
        assert!(cell.contains([4.0, 0.0, 7.0]));
        assert!(!cell.contains([4.5, 0.0, 0.0]));
        assert_eq!(cell.size(), 4);
        assert_eq!(cell.center(), [2, 2, 0]);
        assert!(cell.is_leaf());
    }
}
