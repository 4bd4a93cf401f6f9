//! Hanging-entity detection and parent linking.
//!
//! Where a leaf meets a coarser neighbor, the fine side's entities lie on
//! the coarse side's edge or face without being part of it. Such entities
//! are *hanging*: they carry no independent degree of freedom and are
//! interpolated from the coarse entity they lie on.
//!
//! 3-D: a face cited by fewer than two leaves, off the domain boundary, and
//! with no node at its centroid is a quarter of a coarse face `P`. The
//! quarter's corner at `P`'s centroid identifies which quarter it is, and a
//! per-quarter case table gives the parents of its edges and corners.
//!
//! 2-D: the same test on edges, where the fine edge is half of a coarse one.

use crate::tree::Tree;
use octmesh_core::{Axis, Dimension, EdgeId, FaceId, MeshError, NodeId};
use tracing::{debug, info_span};

/// Hanging entities of each kind in registry order.
#[derive(Clone, Debug, Default)]
pub(crate) struct HangingLists {
    pub(crate) nodes: Vec<NodeId>,
    pub(crate) edges: [Vec<EdgeId>; 3],
    pub(crate) faces: [Vec<FaceId>; 3],
}

/// Parents of a hanging face's entities, for one quarter of the coarse face.
struct QuarterCase {
    /// For each edge slot of the quarter, the two coarse edge slots it
    /// interpolates from. Slots repeat when the quarter edge is half of a
    /// single coarse edge.
    edges: [[usize; 2]; 4],
    /// The two quarter corners on coarse edges, each with the coarse corner
    /// pair that bounds that edge.
    midpoints: [(usize, [usize; 2]); 2],
}

/// Indexed by the quarter corner at the coarse centroid. The corner
/// opposite it (`3 - k`) is a coarse corner and stays regular.
const QUARTERS: [QuarterCase; 4] = [
    QuarterCase {
        edges: [[0, 2], [1, 1], [2, 2], [1, 3]],
        midpoints: [(1, [1, 3]), (2, [2, 3])],
    },
    QuarterCase {
        edges: [[0, 0], [1, 1], [0, 2], [1, 3]],
        midpoints: [(0, [0, 2]), (3, [2, 3])],
    },
    QuarterCase {
        edges: [[0, 2], [1, 3], [2, 2], [3, 3]],
        midpoints: [(0, [0, 1]), (3, [1, 3])],
    },
    QuarterCase {
        edges: [[0, 0], [1, 3], [0, 2], [3, 3]],
        midpoints: [(1, [0, 1]), (2, [0, 2])],
    },
];

impl Tree {
    pub(crate) fn resolve_hanging(&mut self) -> Result<(), MeshError> {
        let _span = info_span!("hanging").entered();
        let dim = self.config.dimension;
        match dim {
            Dimension::Three => {
                for &normal in dim.axes() {
                    self.resolve_faces(normal)?;
                }
            }
            Dimension::Two => {
                for &axis in dim.axes() {
                    self.resolve_edges(axis)?;
                }
            }
        }

        self.hanging = HangingLists {
            nodes: self.store.nodes().hanging_ids(),
            edges: Axis::ALL.map(|a| self.store.edges(a).hanging_ids()),
            faces: Axis::ALL.map(|a| self.store.faces(a).hanging_ids()),
        };
        debug!(
            nodes = self.hanging.nodes.len(),
            edges = self.hanging.edges.iter().map(Vec::len).sum::<usize>(),
            faces = self.hanging.faces.iter().map(Vec::len).sum::<usize>(),
            "hanging entities linked"
        );
        Ok(())
    }

    fn resolve_faces(&mut self, normal: Axis) -> Result<(), MeshError> {
        let n = normal.index();
        let candidates: Vec<FaceId> = self
            .store
            .faces(normal)
            .iter()
            .filter(|(_, f)| {
                f.reference < 2
                    && f.location[n] != 0
                    && f.location[n] != self.extent[n]
                    && !self.store.nodes().contains_key(f.key)
            })
            .map(|(id, _)| id)
            .collect();

        for fid in candidates {
            let faces = self.store.faces(normal);
            let fine = &faces[fid];
            let found = (0..4).find_map(|k| {
                let key = self.store.nodes()[fine.points[k]].key;
                faces
                    .find(key)
                    .filter(|&p| faces[p].area == 4 * fine.area)
                    .map(|p| (k, p))
            });
            let Some((k, pid)) = found else {
                return Err(MeshError::TopologyViolation {
                    reason: format!(
                        "no coarse {normal}-face under hanging face at {:?}",
                        fine.location
                    ),
                });
            };

            let case = &QUARTERS[k];
            let fine_points = fine.points;
            let fine_edges = fine.edges;
            let fine_axes = [0, 1, 2, 3].map(|s| fine.edge_axis(s));
            let coarse_points = faces[pid].points;
            let coarse_edges = faces[pid].edges;

            for slot in 0..4 {
                let [a, b] = case.edges[slot];
                let (Some(e), Some(pa), Some(pb)) =
                    (fine_edges[slot], coarse_edges[a], coarse_edges[b])
                else {
                    return Err(MeshError::TopologyViolation {
                        reason: format!("{normal}-face {fid} or its parent has unlinked edges"),
                    });
                };
                let edge = &mut self.store.edges_mut(fine_axes[slot])[e];
                edge.hanging = true;
                edge.parents = [Some(pa), Some(pb)];
            }

            let nodes = self.store.nodes_mut();
            let center = &mut nodes[fine_points[k]];
            center.hanging = true;
            center.parents = coarse_points.map(Some);
            for (corner, [a, b]) in case.midpoints {
                let node = &mut nodes[fine_points[corner]];
                node.hanging = true;
                node.parents = [a, b, a, b].map(|c| Some(coarse_points[c]));
            }

            let face = &mut self.store.faces_mut(normal)[fid];
            face.hanging = true;
            face.parent = Some(pid);
        }
        Ok(())
    }

    fn resolve_edges(&mut self, axis: Axis) -> Result<(), MeshError> {
        let cross = if axis == Axis::X { 1 } else { 0 };
        let candidates: Vec<EdgeId> = self
            .store
            .edges(axis)
            .iter()
            .filter(|(_, e)| {
                e.reference < 2
                    && e.location[cross] != 0
                    && e.location[cross] != self.extent[cross]
                    && !self.store.nodes().contains_key(e.key)
            })
            .map(|(id, _)| id)
            .collect();

        for eid in candidates {
            let edges = self.store.edges(axis);
            let fine = &edges[eid];
            let found = fine.points.into_iter().find_map(|end| {
                let key = self.store.nodes()[end].key;
                edges
                    .find(key)
                    .filter(|&p| edges[p].length == 2 * fine.length)
                    .map(|p| (end, p))
            });
            let Some((end, pid)) = found else {
                return Err(MeshError::TopologyViolation {
                    reason: format!(
                        "no coarse {axis}-edge under hanging edge at {:?}",
                        fine.location
                    ),
                });
            };
            let [a, b] = edges[pid].points;

            let node = &mut self.store.nodes_mut()[end];
            node.hanging = true;
            node.parents = [Some(a), Some(b), Some(a), Some(b)];

            let edge = &mut self.store.edges_mut(axis)[eid];
            edge.hanging = true;
            edge.parents = [Some(pid), Some(pid)];
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Cell, Tree, TreeConfig};
    use octmesh_core::{Axis, CellId, Dimension, MeshError, SpatialKey};

    fn corner_refined(dim: Dimension, max_level: u32) -> Tree {
        let p = [1.0, 1.0, 1.0];
        let desired = move |c: &Cell| if c.contains(p) { max_level } else { 0 };
        Tree::build(TreeConfig::new(dim, max_level), &desired).unwrap()
    }

    fn node_at(t: &Tree, loc: [i64; 3]) -> &octmesh_registry::Node {
        let id = t.nodes().find(SpatialKey::of(loc)).unwrap();
        t.node(id).unwrap()
    }

    #[test]
    fn quad_corner_refinement_hangs_two_nodes() {
        let t = corner_refined(Dimension::Two, 2);
        assert_eq!(t.leaves().len(), 7);
        let hanging: Vec<_> = t
            .hanging_nodes()
            .iter()
            .map(|&n| t.node(n).unwrap().location)
            .collect();
        assert_eq!(hanging.len(), 2);
        assert!(hanging.contains(&[4, 2, 0]));
        assert!(hanging.contains(&[2, 4, 0]));

        let mid = node_at(&t, [2, 4, 0]);
        let parents: Vec<_> = mid
            .parents
            .iter()
            .map(|p| t.node(p.unwrap()).unwrap().location)
            .collect();
        assert_eq!(parents, vec![[0, 4, 0], [4, 4, 0], [0, 4, 0], [4, 4, 0]]);

        assert_eq!(t.hanging_edges(Axis::X).len(), 2);
        assert_eq!(t.hanging_edges(Axis::Y).len(), 2);
        for &e in t.hanging_edges(Axis::X) {
            let edge = t.edge(Axis::X, e).unwrap();
            let parent = t.edge(Axis::X, edge.parents[0].unwrap()).unwrap();
            assert_eq!(parent.location, [2, 4, 0]);
            assert_eq!(edge.parents[0], edge.parents[1]);
        }
    }

    #[test]
    fn hex_corner_refinement_hangs_three_planes() {
        let t = corner_refined(Dimension::Three, 2);
        assert_eq!(t.leaves().len(), 15);
        for normal in Axis::ALL {
            assert_eq!(t.hanging_faces(normal).len(), 4, "{normal}-faces");
            assert_eq!(t.hanging_edges(normal).len(), 10, "{normal}-edges");
        }
        assert_eq!(t.hanging_nodes().len(), 12);

        // The coarse face centroid interpolates from all four coarse corners.
        let center = node_at(&t, [4, 2, 2]);
        assert!(center.hanging);
        assert_eq!(center.parent_count(), 4);
        let mut parents: Vec<_> = center
            .parents
            .iter()
            .map(|p| t.node(p.unwrap()).unwrap().location)
            .collect();
        parents.sort();
        assert_eq!(parents, vec![[4, 0, 0], [4, 0, 4], [4, 4, 0], [4, 4, 4]]);

        // A coarse corner on the refinement boundary stays regular.
        assert!(!node_at(&t, [4, 4, 4]).hanging);
        assert!(!node_at(&t, [4, 0, 0]).hanging);
    }

    #[test]
    fn hanging_face_edges_point_at_coarse_edges() {
        let t = corner_refined(Dimension::Three, 2);
        for &f in t.hanging_faces(Axis::X) {
            let face = t.face(Axis::X, f).unwrap();
            let parent = t.face(Axis::X, face.parent.unwrap()).unwrap();
            assert_eq!(parent.location, [4, 2, 2]);
            assert_eq!(parent.area, 4 * face.area);
            for slot in 0..4 {
                let axis = face.edge_axis(slot);
                let edge = t.edge(axis, face.edges[slot].unwrap()).unwrap();
                assert!(edge.hanging);
                for p in edge.parents {
                    let coarse = t.edge(axis, p.unwrap()).unwrap();
                    assert_eq!(coarse.length, 4);
                    assert!(parent.edges.contains(&p));
                }
            }
        }
    }

    /// Refined and enumerated with the skeleton derived, hanging entities
    /// not yet resolved.
    fn skeleton_only(dim: Dimension) -> Tree {
        let p = [1.0, 1.0, 1.0];
        let desired = move |c: &Cell| if c.contains(p) { 2 } else { 0 };
        let mut t = Tree::new(TreeConfig::new(dim, 2)).unwrap();
        t.divide(CellId::ROOT, false, &desired).unwrap();
        t.build_cell_vector();
        t.derive_skeleton();
        t
    }

    #[test]
    fn missing_coarse_edge_is_a_topology_violation() {
        let mut t = skeleton_only(Dimension::Two);
        let coarse = t.edges(Axis::X).find(SpatialKey::of([2, 4, 0])).unwrap();
        assert_eq!(t.edges(Axis::X)[coarse].length, 4);
        t.store.edges_mut(Axis::X)[coarse].length = 3;
        assert!(matches!(t.resolve_hanging(), Err(MeshError::TopologyViolation { .. })));
    }

    #[test]
    fn missing_coarse_face_is_a_topology_violation() {
        let mut t = skeleton_only(Dimension::Three);
        let coarse = t.faces(Axis::X).find(SpatialKey::of([4, 2, 2])).unwrap();
        assert_eq!(t.faces(Axis::X)[coarse].area, 16);
        t.store.faces_mut(Axis::X)[coarse].area = 15;
        assert!(matches!(t.resolve_hanging(), Err(MeshError::TopologyViolation { .. })));
    }

    #[test]
    fn resolve_can_be_retried_after_a_violation() {
        let mut t = skeleton_only(Dimension::Two);
        let coarse = t.edges(Axis::X).find(SpatialKey::of([2, 4, 0])).unwrap();
        t.store.edges_mut(Axis::X)[coarse].length = 3;
        assert!(matches!(t.resolve(), Err(MeshError::TopologyViolation { .. })));

        t.store.edges_mut(Axis::X)[coarse].length = 4;
        t.resolve().unwrap();
        for axis in [Axis::X, Axis::Y] {
            assert!(t.edges(axis).iter().all(|(_, e)| e.reference <= 2));
            assert_eq!(t.hanging_edges(axis).len(), 2, "{axis}-edges");
        }
        assert!(t.faces(Axis::Z).iter().all(|(_, f)| f.reference == 1));
        assert_eq!(t.hanging_nodes().len(), 2);
    }

    #[test]
    fn uniform_mesh_has_nothing_hanging() {
        let t = Tree::build(TreeConfig::new(Dimension::Three, 2), &|_: &Cell| 2).unwrap();
        assert!(t.hanging_nodes().is_empty());
        for axis in Axis::ALL {
            assert!(t.hanging_edges(axis).is_empty());
            assert!(t.hanging_faces(axis).is_empty());
        }
    }
}
