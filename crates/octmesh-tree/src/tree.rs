//! The mesh façade.
//!
//! [`Tree`] owns the cell arena and the entity registries and runs the
//! build pipeline:
//!
//! ```text
//!   new ─► divide ─► build_cell_vector ─► resolve ─► number
//!          (balance)   (leaf order)       (skeleton,  (dof
//!                                          hanging)    indices)
//! ```
//!
//! [`Tree::build`] runs every stage in order. The stages are also public so
//! a caller can refine incrementally, for example forcing extra splits
//! before the skeleton is derived.

use std::fmt;

use crate::cell::Cell;
use crate::config::TreeConfig;
use crate::hanging::HangingLists;
use crate::predicate::RefinementPredicate;
use octmesh_core::{Axis, CellId, Dimension, EdgeId, FaceId, MeshError, NodeId};
use octmesh_registry::{Edge, EntityStore, Face, Node, Registry};
use smallvec::SmallVec;
use tracing::debug;

/// Pipeline progress. Stages only move forward, except that refining
/// again after enumeration drops back to [`Stage::Refining`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Stage {
    Refining,
    Enumerated,
    Resolved,
    Numbered,
}

/// An adaptive, 2:1-balanced quadtree or octree mesh.
#[derive(Clone, Debug)]
pub struct Tree {
    pub(crate) config: TreeConfig,
    pub(crate) extent: [i64; 3],
    pub(crate) cells: Vec<Cell>,
    pub(crate) store: EntityStore,
    pub(crate) leaves: Vec<CellId>,
    pub(crate) hanging: HangingLists,
    pub(crate) stage: Stage,
}

impl Tree {
    /// Create an unrefined tree: the domain corners and the root cell.
    pub fn new(config: TreeConfig) -> Result<Self, MeshError> {
        config.validate()?;
        let extent = config.extent();
        let dim = config.dimension;

        let mut store = EntityStore::new();
        let corners: SmallVec<[NodeId; 8]> = (0..dim.corner_count())
            .map(|corner| {
                let loc = [0, 1, 2].map(|a| {
                    if (corner >> a) & 1 == 1 {
                        extent[a]
                    } else {
                        0
                    }
                });
                store.get_or_create_node(loc)
            })
            .collect();
        let root = Cell::new(CellId::ROOT, corners, [0, 0, 0], extent, 0, None);

        debug!(
            dimension = dim.ndim(),
            max_level = config.max_level,
            ?extent,
            "tree created"
        );
        Ok(Self {
            config,
            extent,
            cells: vec![root],
            store,
            leaves: Vec::new(),
            hanging: HangingLists::default(),
            stage: Stage::Refining,
        })
    }

    /// Build a complete mesh: refine from the root with `predicate`,
    /// enumerate leaves, resolve hanging entities, and assign indices.
    pub fn build(
        config: TreeConfig,
        predicate: &dyn RefinementPredicate,
    ) -> Result<Self, MeshError> {
        let mut tree = Self::new(config)?;
        tree.divide(CellId::ROOT, false, predicate)?;
        tree.build_cell_vector();
        tree.resolve()?;
        tree.number()?;
        debug!(stats = %tree.stats(), "mesh built");
        Ok(tree)
    }

    /// Collect the leaves depth-first in child order and record each
    /// leaf's position as its index.
    ///
    /// Idempotent: calling it again without further refinement yields the
    /// same list.
    pub fn build_cell_vector(&mut self) -> &[CellId] {
        let mut leaves = Vec::new();
        let mut stack = vec![CellId::ROOT];
        while let Some(id) = stack.pop() {
            let cell = &self.cells[id.index()];
            if cell.is_leaf() {
                leaves.push(id);
            } else {
                stack.extend(cell.children.iter().rev());
            }
        }
        for (i, &id) in leaves.iter().enumerate() {
            self.cells[id.index()].index = i as u32;
        }
        self.leaves = leaves;
        if self.stage == Stage::Refining {
            self.stage = Stage::Enumerated;
        }
        debug!(leaves = self.leaves.len(), cells = self.cells.len(), "leaf list built");
        &self.leaves
    }

    /// Derive edges and faces from the leaves, then detect and link the
    /// hanging entities.
    ///
    /// Seals the tree against further refinement. Calling it again is a
    /// no-op; after an error the tree stays enumerated and may be resolved
    /// again.
    pub fn resolve(&mut self) -> Result<(), MeshError> {
        match self.stage {
            Stage::Refining => Err(MeshError::StageNotReached {
                required: "build_cell_vector",
            }),
            Stage::Enumerated => {
                self.derive_skeleton();
                self.resolve_hanging()?;
                self.stage = Stage::Resolved;
                Ok(())
            }
            Stage::Resolved | Stage::Numbered => Ok(()),
        }
    }

    /// Quadtree or octree.
    pub fn dimension(&self) -> Dimension {
        self.config.dimension
    }

    /// Deepest level any cell may reach.
    pub fn max_level(&self) -> u32 {
        self.config.max_level
    }

    /// Domain size `[nx, ny, nz]`; `nz` is 0 in 2-D.
    pub fn extent(&self) -> [i64; 3] {
        self.extent
    }

    /// The cell named by `id`.
    pub fn cell(&self, id: CellId) -> Result<&Cell, MeshError> {
        self.cells
            .get(id.index())
            .ok_or(MeshError::UnknownCell { cell: id })
    }

    /// Number of cells, internal and leaf.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Leaves in enumeration order. Empty until
    /// [`build_cell_vector`](Self::build_cell_vector) runs.
    pub fn leaves(&self) -> &[CellId] {
        &self.leaves
    }

    /// The node registry.
    pub fn nodes(&self) -> &Registry<Node> {
        self.store.nodes()
    }

    /// Edges running along `axis`.
    pub fn edges(&self, axis: Axis) -> &Registry<Edge> {
        self.store.edges(axis)
    }

    /// Faces with normal `normal`.
    pub fn faces(&self, normal: Axis) -> &Registry<Face> {
        self.store.faces(normal)
    }

    /// A node by handle.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.store.nodes().get(id)
    }

    /// An edge by axis and handle.
    pub fn edge(&self, axis: Axis, id: EdgeId) -> Option<&Edge> {
        self.store.edges(axis).get(id)
    }

    /// A face by normal and handle.
    pub fn face(&self, normal: Axis, id: FaceId) -> Option<&Face> {
        self.store.faces(normal).get(id)
    }

    /// Hanging nodes in registry order (after [`resolve`](Self::resolve)).
    pub fn hanging_nodes(&self) -> &[NodeId] {
        &self.hanging.nodes
    }

    /// Hanging edges along `axis` in registry order.
    pub fn hanging_edges(&self, axis: Axis) -> &[EdgeId] {
        &self.hanging.edges[axis.index()]
    }

    /// Hanging faces with normal `normal` in registry order.
    pub fn hanging_faces(&self, normal: Axis) -> &[FaceId] {
        &self.hanging.faces[normal.index()]
    }

    /// Whether [`number`](Self::number) has assigned indices.
    pub fn is_numbered(&self) -> bool {
        self.stage == Stage::Numbered
    }

    /// Counts of cells and entities.
    pub fn stats(&self) -> MeshStats {
        let mut leaves_per_level = vec![0; self.config.max_level as usize + 1];
        for &id in &self.leaves {
            leaves_per_level[self.cells[id.index()].level as usize] += 1;
        }
        let axes = self.config.dimension.axes();
        MeshStats {
            dimension: self.config.dimension,
            cells: self.cells.len(),
            leaves: self.leaves.len(),
            leaves_per_level,
            nodes: self.store.nodes().len(),
            hanging_nodes: self.hanging.nodes.len(),
            edges: axes.iter().map(|&a| self.store.edges(a).len()).sum(),
            hanging_edges: self.hanging.edges.iter().map(Vec::len).sum(),
            faces: self.store.face_count(),
            hanging_faces: self.hanging.faces.iter().map(Vec::len).sum(),
        }
    }
}

/// Summary counts for a mesh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeshStats {
    /// Quadtree or octree.
    pub dimension: Dimension,
    /// Total cells, internal and leaf.
    pub cells: usize,
    /// Leaf cells.
    pub leaves: usize,
    /// Leaf count per level, indexed by level.
    pub leaves_per_level: Vec<usize>,
    /// Nodes.
    pub nodes: usize,
    /// Hanging nodes.
    pub hanging_nodes: usize,
    /// Edges across all axes.
    pub edges: usize,
    /// Hanging edges across all axes.
    pub hanging_edges: usize,
    /// Faces across all normals.
    pub faces: usize,
    /// Hanging faces across all normals.
    pub hanging_faces: usize,
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-D: {} leaves of {} cells [", self.dimension.ndim(), self.leaves, self.cells)?;
        let mut first = true;
        for (level, n) in self.leaves_per_level.iter().enumerate() {
            if *n == 0 {
                continue;
            }
            if !first {
                write!(f, " ")?;
            }
            write!(f, "L{level}:{n}")?;
            first = false;
        }
        write!(
            f,
            "], {} nodes ({} hanging), {} edges ({} hanging), {} faces ({} hanging)",
            self.nodes,
            self.hanging_nodes,
            self.edges,
            self.hanging_edges,
            self.faces,
            self.hanging_faces
        )
    }
}
