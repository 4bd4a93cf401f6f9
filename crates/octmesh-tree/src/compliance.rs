//! Structural invariant helpers for tree unit tests.
//!
//! These check the arena-level wiring that the public API hides: child
//! tiling, parent links, and stored neighbor links. Public-surface checks
//! (balance, partition, hanging consistency, numbering) live in
//! `octmesh-test-utils`.

use crate::cell::{mirror, on_face};
use crate::tree::Tree;
use octmesh_core::CellId;

/// Assert that every internal cell has `2^n` children that tile it, one
/// level deeper, each linking back to it.
pub fn assert_children_tile_parent(tree: &Tree) {
    let count = tree.config.dimension.corner_count();
    for (i, cell) in tree.cells.iter().enumerate() {
        assert_eq!(cell.id, CellId(i as u32), "arena slot mismatch at {i}");
        if cell.is_leaf() {
            continue;
        }
        assert_eq!(cell.children.len(), count, "{} has a partial split", cell.id);
        let half = cell.size() / 2;
        for (octant, &child) in cell.children.iter().enumerate() {
            let c = &tree.cells[child.index()];
            assert_eq!(c.parent, Some(cell.id));
            assert_eq!(c.level, cell.level + 1);
            assert_eq!(c.size(), half, "{child} is not half of {}", cell.id);
            for &a in tree.config.dimension.axes() {
                let expect = if (octant >> a.index()) & 1 == 1 {
                    cell.center[a.index()]
                } else {
                    cell.lo[a.index()]
                };
                assert_eq!(c.lo[a.index()], expect, "{child} misplaced along {a}");
            }
        }
    }
}

/// Assert that stored neighbor links point at face-adjacent cells that are
/// never finer, and that same-level links are mutual.
pub fn assert_links_consistent(tree: &Tree) {
    for cell in &tree.cells {
        for &d in tree.config.dimension.directions() {
            let Some(n) = cell.neighbors[d.index()] else {
                continue;
            };
            let nb = &tree.cells[n.index()];
            assert!(nb.level <= cell.level, "{} links {d} to finer {n}", cell.id);
            let a = d.axis().index();
            let (near, far) = if d.is_positive() {
                (cell.hi[a], nb.lo[a])
            } else {
                (cell.lo[a], nb.hi[a])
            };
            assert_eq!(near, far, "{} and {n} do not share a {d} face", cell.id);
            if nb.level == cell.level {
                assert_eq!(
                    nb.neighbors[d.opposite().index()],
                    Some(cell.id),
                    "same-level link {} -{d}-> {n} is one-way",
                    cell.id
                );
            }
        }
    }
}

/// Assert that interior siblings link to each other.
pub fn assert_siblings_linked(tree: &Tree) {
    for cell in tree.cells.iter().filter(|c| !c.is_leaf()) {
        for (octant, &child) in cell.children.iter().enumerate() {
            for &d in tree.config.dimension.directions() {
                if on_face(octant, d) {
                    continue;
                }
                let sibling = cell.children[mirror(octant, d.axis())];
                assert_eq!(
                    tree.cells[child.index()].neighbors[d.index()],
                    Some(sibling),
                    "{child} not linked {d} to its sibling"
                );
            }
        }
    }
}

/// Run every structural check.
pub fn run_structure_compliance(tree: &Tree) {
    assert_children_tile_parent(tree);
    assert_links_consistent(tree);
    assert_siblings_linked(tree);
}
