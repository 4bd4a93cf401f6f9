//! Edges and faces derived from the leaf cells.
//!
//! Every leaf registers its edges and faces through the shared registries,
//! so an entity shared by two leaves exists once and its `reference` count
//! records how many leaves cite it. A 2-D leaf has four edges and one
//! z-normal face; a 3-D leaf has twelve edges and six faces.

use crate::tree::Tree;
use octmesh_core::{Axis, Dimension, FaceId, NodeId};
use octmesh_registry::Face;
use smallvec::SmallVec;
use tracing::{debug, info_span};

/// Corners of the low and high face of a hexahedron for each normal axis,
/// in the face's canonical `(u, v)` order.
const HEX_FACES: [[[usize; 4]; 2]; 3] = [
    [[0, 2, 4, 6], [1, 3, 5, 7]],
    [[0, 1, 4, 5], [2, 3, 6, 7]],
    [[0, 1, 2, 3], [4, 5, 6, 7]],
];

impl Tree {
    pub(crate) fn derive_skeleton(&mut self) {
        let _span = info_span!("skeleton").entered();
        let dim = self.config.dimension;

        // A retried resolve walks the leaves again; citations restart at zero.
        for axis in Axis::ALL {
            for edge in self.store.edges_mut(axis).values_mut() {
                edge.reference = 0;
            }
            for face in self.store.faces_mut(axis).values_mut() {
                face.reference = 0;
            }
        }

        for i in 0..self.leaves.len() {
            let leaf = self.leaves[i];
            let corners = self.cells[leaf.index()].corners.clone();

            let mut edges = SmallVec::new();
            for &axis in dim.axes() {
                let bit = 1 << axis.index();
                for c in (0..corners.len()).filter(|c| c & bit == 0) {
                    let e = self
                        .store
                        .get_or_create_edge(axis, corners[c], corners[c | bit]);
                    self.store.edges_mut(axis)[e].reference += 1;
                    edges.push((axis, e));
                }
            }

            let mut faces = SmallVec::new();
            match dim {
                Dimension::Two => {
                    let points = [corners[0], corners[1], corners[2], corners[3]];
                    faces.push((Axis::Z, self.cite_face(Axis::Z, points)));
                }
                Dimension::Three => {
                    for &normal in dim.axes() {
                        for side in HEX_FACES[normal.index()] {
                            let points = side.map(|c| corners[c]);
                            faces.push((normal, self.cite_face(normal, points)));
                        }
                    }
                }
            }

            let cell = &mut self.cells[leaf.index()];
            cell.edges = edges;
            cell.faces = faces;
        }

        debug!(
            nodes = self.store.nodes().len(),
            edges = self.store.edge_count(),
            faces = self.store.face_count(),
            "skeleton derived"
        );
    }

    /// Register one leaf's citation of the face with corners `points`,
    /// linking its bounding edges the first time it is seen.
    fn cite_face(&mut self, normal: Axis, points: [NodeId; 4]) -> FaceId {
        let f = self.store.get_or_create_face(normal, points);
        if self.store.faces(normal)[f].edges.iter().all(Option::is_none) {
            for slot in 0..4 {
                let (a, b) = Face::edge_corners(slot);
                let axis = self.store.faces(normal)[f].edge_axis(slot);
                let e = self.store.get_or_create_edge(axis, points[a], points[b]);
                self.store.faces_mut(normal)[f].edges[slot] = Some(e);
            }
        }
        self.store.faces_mut(normal)[f].reference += 1;
        f
    }
}

#[cfg(test)]
mod tests {
    use crate::{Cell, Tree, TreeConfig};
    use octmesh_core::{Axis, CellId, Dimension};

    fn enumerated(dim: Dimension, max_level: u32, desired: impl Fn(&Cell) -> u32) -> Tree {
        let mut t = Tree::new(TreeConfig::new(dim, max_level)).unwrap();
        t.divide(CellId::ROOT, false, &desired).unwrap();
        t.build_cell_vector();
        t.resolve().unwrap();
        t
    }

    #[test]
    fn quad_leaf_has_four_edges_and_one_face() {
        let t = enumerated(Dimension::Two, 1, |_: &Cell| 0);
        let root = t.cell(CellId::ROOT).unwrap();
        assert_eq!(root.edges().len(), 4);
        assert_eq!(root.faces().len(), 1);
        let (normal, f) = root.faces()[0];
        assert_eq!(normal, Axis::Z);
        let face = t.face(Axis::Z, f).unwrap();
        assert_eq!(face.area, 16);
        assert_eq!(face.reference, 1);
        // e0 runs along y from p0 to p2.
        let e0 = face.edges[0].unwrap();
        let edge = t.edge(Axis::Y, e0).unwrap();
        assert_eq!(edge.points, [face.points[0], face.points[2]]);
        assert_eq!(edge.length, 4);
    }

    #[test]
    fn shared_edges_count_both_leaves() {
        let t = enumerated(Dimension::Two, 1, |_: &Cell| 1);
        assert_eq!(t.edges(Axis::X).len(), 6);
        assert_eq!(t.edges(Axis::Y).len(), 6);
        let interior = t
            .edges(Axis::Y)
            .iter()
            .filter(|(_, e)| e.reference == 2)
            .count();
        assert_eq!(interior, 2);
    }

    #[test]
    fn hex_leaf_has_twelve_edges_and_six_faces() {
        let t = enumerated(Dimension::Three, 1, |_: &Cell| 1);
        for &leaf in t.leaves() {
            let cell = t.cell(leaf).unwrap();
            assert_eq!(cell.edges().len(), 12);
            assert_eq!(cell.faces().len(), 6);
        }
        // 2×2×2 cells: 3·3·2 edges per axis, 2·2·3 faces per normal.
        for axis in Axis::ALL {
            assert_eq!(t.edges(axis).len(), 18);
            assert_eq!(t.faces(axis).len(), 12);
        }
        // Top faces land in the z registry.
        let top = t.cell(t.leaves()[7]).unwrap().faces()[5];
        assert_eq!(top.0, Axis::Z);
        assert_eq!(t.face(Axis::Z, top.1).unwrap().location, [3, 3, 4]);
    }

    #[test]
    fn face_corners_follow_plane_axes() {
        let t = enumerated(Dimension::Three, 0, |_: &Cell| 0);
        let root = t.cell(CellId::ROOT).unwrap();
        let (normal, f) = root.faces()[2];
        assert_eq!(normal, Axis::Y);
        let face = t.face(Axis::Y, f).unwrap();
        let locs: Vec<_> = face
            .points
            .iter()
            .map(|&p| t.node(p).unwrap().location)
            .collect();
        assert_eq!(locs, vec![[0, 0, 0], [2, 0, 0], [0, 0, 2], [2, 0, 2]]);
        assert_eq!(face.area, 4);
    }
}
