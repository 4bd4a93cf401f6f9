//! Subdivision, 2:1 balance, and neighbor wiring.
//!
//! A split is committed only when every settled neighbor of the cell is at
//! the cell's level or finer. Coarser neighbors are split first through a
//! worklist, so the tree never passes through an unbalanced state. Every
//! cell pushed on the worklist is strictly coarser than the cell that
//! pushed it, which bounds the cascade by the tree depth.

use crate::cell::{lattice_point, mirror, on_face, Cell};
use crate::predicate::RefinementPredicate;
use crate::tree::{Stage, Tree};
use octmesh_core::{CellId, Dimension, Direction, MeshError, NodeId};
use smallvec::SmallVec;
use tracing::{debug, info_span, trace};

impl Tree {
    /// Refine `cell`.
    ///
    /// With `force` the cell is split exactly once (if it is a leaf below
    /// the maximum level). Otherwise the predicate is consulted and the
    /// refinement recurses into the children, including children created
    /// by an earlier forced split.
    ///
    /// Neighbors coarser than `cell` are split first to keep face-adjacent
    /// leaves within one level of each other.
    pub fn divide(
        &mut self,
        cell: CellId,
        force: bool,
        predicate: &dyn RefinementPredicate,
    ) -> Result<(), MeshError> {
        if self.stage >= Stage::Resolved {
            return Err(MeshError::Sealed);
        }
        self.cell(cell)?;
        self.stage = Stage::Refining;

        let _span = info_span!("divide", %cell, force).entered();
        let before = self.cells.len();
        if force {
            self.split_balanced(cell);
        } else {
            self.visit(cell, predicate);
        }
        debug!(
            cells = self.cells.len(),
            created = self.cells.len() - before,
            "refinement finished"
        );
        Ok(())
    }

    fn visit(&mut self, id: CellId, predicate: &dyn RefinementPredicate) {
        let cell = &self.cells[id.index()];
        if cell.level >= self.config.max_level {
            return;
        }
        if predicate.desired_level(cell) <= cell.level {
            return;
        }
        if cell.is_leaf() {
            self.split_balanced(id);
        }
        let children = self.cells[id.index()].children.clone();
        for child in children {
            self.visit(child, predicate);
        }
    }

    /// Split `target`, first splitting any coarser neighbors.
    fn split_balanced(&mut self, target: CellId) {
        let mut stack = vec![target];
        while let Some(&top) = stack.last() {
            let cell = &self.cells[top.index()];
            if !cell.is_leaf() || cell.level >= self.config.max_level {
                stack.pop();
                continue;
            }
            let level = cell.level;
            let coarse: SmallVec<[CellId; 6]> = self
                .config
                .dimension
                .directions()
                .iter()
                .filter_map(|&d| self.settle(top, d))
                .filter(|n| self.cells[n.index()].level < level)
                .collect();

            if coarse.is_empty() {
                stack.pop();
                if top != target {
                    trace!(cell = %top, level, "forced split for balance");
                }
                self.spawn(top);
            } else {
                stack.extend(coarse);
            }
        }
    }

    /// Settled neighbor of `id` in `direction`.
    ///
    /// Starts from the stored link and descends toward `id` until it
    /// reaches a leaf or a cell at `id`'s level. The result is never finer
    /// than `id`.
    pub(crate) fn settle(&self, id: CellId, direction: Direction) -> Option<CellId> {
        let cell = &self.cells[id.index()];
        let mut n = cell.neighbors[direction.index()]?;
        loop {
            let nb = &self.cells[n.index()];
            if nb.is_leaf() || nb.level >= cell.level {
                return Some(n);
            }
            n = nb.children[child_toward(nb, cell, direction, self.config.dimension)];
        }
    }

    /// Create the children of leaf `id` and wire their neighbors.
    fn spawn(&mut self, id: CellId) {
        let dim = self.config.dimension;
        let parent = &self.cells[id.index()];
        let planes = [parent.lo, parent.center, parent.hi];
        let level = parent.level + 1;
        let at = |k: [usize; 3]| [planes[k[0]][0], planes[k[1]][1], planes[k[2]][2]];

        // Mint the 3×3(×3) lattice in z, y, x order. The parent's corners
        // are already registered and come back unchanged.
        let layers = if dim == Dimension::Three { 3 } else { 1 };
        let mut lattice: SmallVec<[NodeId; 27]> = SmallVec::new();
        for kz in 0..layers {
            for ky in 0..3 {
                for kx in 0..3 {
                    lattice.push(self.store.get_or_create_node(at([kx, ky, kz])));
                }
            }
        }

        let count = dim.corner_count();
        let first = self.cells.len();
        for child in 0..count {
            let corners = (0..count)
                .map(|corner| {
                    let [x, y, z] = lattice_point(child, corner);
                    lattice[x + 3 * y + 9 * z]
                })
                .collect();
            let lo = at(lattice_point(child, 0));
            let hi = at(lattice_point(child, count - 1));
            let cid = CellId((first + child) as u32);
            self.cells.push(Cell::new(cid, corners, lo, hi, level, Some(id)));
        }
        self.cells[id.index()].children =
            (first..first + count).map(|i| CellId(i as u32)).collect();

        self.wire_children(id);
    }

    /// Link the children of `id` to their siblings and to the cells across
    /// the parent's faces.
    ///
    /// All links are computed against the pre-split neighborhood and then
    /// committed together.
    fn wire_children(&mut self, id: CellId) {
        let dim = self.config.dimension;
        let children = self.cells[id.index()].children.clone();
        let mut links: Vec<(CellId, Direction, CellId)> = Vec::new();

        for &d in dim.directions() {
            let outer = self.settle(id, d);
            for (i, &child) in children.iter().enumerate() {
                if !on_face(i, d) {
                    links.push((child, d, children[mirror(i, d.axis())]));
                    continue;
                }
                let Some(n) = outer else { continue };
                let nb = &self.cells[n.index()];
                let target = if nb.is_leaf() {
                    n
                } else {
                    nb.children[child_toward(nb, &self.cells[child.index()], d, dim)]
                };
                links.push((child, d, target));
            }
        }

        for (from, d, to) in links {
            self.link(from, d, to);
        }
    }

    /// Point `from` at `to` across `direction`; the reverse link is set only
    /// between cells of the same level.
    fn link(&mut self, from: CellId, direction: Direction, to: CellId) {
        self.cells[from.index()].neighbors[direction.index()] = Some(to);
        if self.cells[from.index()].level == self.cells[to.index()].level {
            self.cells[to.index()].neighbors[direction.opposite().index()] = Some(from);
        }
    }
}

/// Octant of `from`'s child that touches `target` across `direction`.
///
/// `from` lies in `direction` from `target`. On the direction's axis the
/// child is the half facing `target`; on the other axes it is the half
/// containing `target`'s center.
fn child_toward(from: &Cell, target: &Cell, direction: Direction, dimension: Dimension) -> usize {
    let axis = direction.axis();
    dimension.axes().iter().fold(0, |acc, &a| {
        let high = if a == axis {
            !direction.is_positive()
        } else {
            target.center[a.index()] > from.center[a.index()]
        };
        acc | (usize::from(high) << a.index())
    })
}
