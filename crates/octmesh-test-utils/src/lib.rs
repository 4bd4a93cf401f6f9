//! Test utilities for octmesh development.
//!
//! Provides refinement predicate fixtures (see [`fixtures`]) and invariant
//! checkers that inspect a built [`Tree`] through its public API. Each
//! checker panics with a descriptive message on the first violation.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashSet;

use octmesh_core::{Axis, CellId, Direction, Location, SpatialKey};
use octmesh_registry::{Entity, Registry};
use octmesh_tree::Tree;

pub use fixtures::{PointRefine, SeededRandom, SphereShell, UniformLevel};

/// A point just outside the face of `cell` in `direction`, or `None` when
/// that face is on the domain boundary.
fn probe_across(tree: &Tree, cell: CellId, direction: Direction) -> Option<[f64; 3]> {
    let c = tree.cell(cell).ok()?;
    let a = direction.axis().index();
    let mut p = c.center().map(|v| v as f64);
    if direction.is_positive() {
        if c.hi()[a] == tree.extent()[a] {
            return None;
        }
        p[a] = c.hi()[a] as f64 + 0.5;
    } else {
        if c.lo()[a] == 0 {
            return None;
        }
        p[a] = c.lo()[a] as f64 - 0.5;
    }
    Some(p)
}

fn leaf_level(tree: &Tree, id: CellId) -> u32 {
    match tree.cell(id) {
        Ok(c) => c.level(),
        Err(e) => panic!("leaf {id} missing: {e}"),
    }
}

/// Assert that face-adjacent leaves differ by at most one level.
///
/// Adjacency is found geometrically by locating a point just across each
/// face, independent of the stored neighbor links.
pub fn assert_balanced(tree: &Tree) {
    for &leaf in tree.leaves() {
        let level = leaf_level(tree, leaf);
        for &d in tree.dimension().directions() {
            let Some(p) = probe_across(tree, leaf, d) else {
                continue;
            };
            let other = match tree.containing_cell(p[0], p[1], p[2]) {
                Ok(id) => id,
                Err(e) => panic!("probe {p:?} from {leaf} failed: {e}"),
            };
            let other_level = leaf_level(tree, other);
            assert!(
                level.abs_diff(other_level) <= 1,
                "{leaf} (level {level}) touches {other} (level {other_level}) across {d}"
            );
        }
    }
}

/// Assert that settled neighbors are the cells across each face: never
/// finer than the leaf, subdivided only at the leaf's own level, and absent
/// exactly on the domain boundary.
pub fn assert_neighbors_settled(tree: &Tree) {
    for &leaf in tree.leaves() {
        let level = leaf_level(tree, leaf);
        for &d in tree.dimension().directions() {
            let probe = probe_across(tree, leaf, d);
            let settled = match tree.neighbor(leaf, d) {
                Ok(n) => n,
                Err(e) => panic!("neighbor query on {leaf} failed: {e}"),
            };
            match (probe, settled) {
                (None, None) => {}
                (Some(p), Some(n)) => {
                    let cell = match tree.cell(n) {
                        Ok(c) => c,
                        Err(e) => panic!("{e}"),
                    };
                    assert!(
                        cell.contains(p),
                        "{leaf} settles {d} to {n}, which is not across the face"
                    );
                    assert!(cell.level() <= level, "{leaf} settles {d} to finer {n}");
                    if !cell.is_leaf() {
                        assert_eq!(
                            cell.level(),
                            level,
                            "{leaf} settles {d} to coarser internal {n}"
                        );
                    }
                }
                (p, n) => panic!("{leaf} across {d}: probe {p:?} but neighbor {n:?}"),
            }
        }
    }
}

/// Assert that the leaves tile the domain: volumes add up, every leaf
/// center locates back to that leaf, and leaf indices are list positions.
pub fn assert_leaf_partition(tree: &Tree) {
    let ndim = tree.dimension().ndim();
    let extent = tree.extent();
    let domain: i128 = (0..ndim).map(|a| extent[a] as i128).product();
    let mut total: i128 = 0;
    for (i, &leaf) in tree.leaves().iter().enumerate() {
        let cell = match tree.cell(leaf) {
            Ok(c) => c,
            Err(e) => panic!("{e}"),
        };
        assert!(cell.is_leaf(), "{leaf} in the leaf list has children");
        assert_eq!(cell.index(), i as u32, "{leaf} index is not its position");
        total += (cell.size() as i128).pow(ndim as u32);
        let c = cell.center().map(|v| v as f64);
        match tree.containing_cell(c[0], c[1], c[2]) {
            Ok(found) => assert_eq!(found, leaf, "center of {leaf} locates to {found}"),
            Err(e) => panic!("center of {leaf} not located: {e}"),
        }
    }
    assert_eq!(total, domain, "leaf volumes do not sum to the domain");
}

/// Assert that hanging flags and parent slots agree for every entity, and
/// that parents are the coarser entities the hanging ones lie on.
pub fn assert_hanging_consistent(tree: &Tree) {
    for (id, node) in tree.nodes().iter() {
        let expected = if node.hanging { 4 } else { 0 };
        assert_eq!(node.parent_count(), expected, "node {id} at {:?}", node.location);
        if node.hanging {
            let parents: Vec<Location> = node
                .parents
                .iter()
                .flatten()
                .map(|&p| tree.nodes()[p].location)
                .collect();
            let mean = |a: usize| parents.iter().map(|l| l[a]).sum::<i64>() / 4;
            assert_eq!(
                [mean(0), mean(1), mean(2)],
                node.location,
                "hanging node {id} is not the average of its parents"
            );
        }
    }

    for axis in Axis::ALL {
        for (id, edge) in tree.edges(axis).iter() {
            let set = edge.parents.iter().flatten().count();
            if !edge.hanging {
                assert_eq!(set, 0, "regular {axis}-edge {id} has parents");
                continue;
            }
            assert_eq!(set, 2, "hanging {axis}-edge {id} lacks parents");
            for p in edge.parents.iter().flatten() {
                let parent = &tree.edges(axis)[*p];
                assert_eq!(parent.length, 2 * edge.length, "{axis}-edge {id} parent {p} size");
            }
        }
        for (id, face) in tree.faces(axis).iter() {
            match (face.hanging, face.parent) {
                (false, None) => {}
                (true, Some(p)) => {
                    let parent = &tree.faces(axis)[p];
                    assert_eq!(parent.area, 4 * face.area, "{axis}-face {id} parent {p} size");
                }
                (hanging, parent) => {
                    panic!("{axis}-face {id}: hanging = {hanging}, parent = {parent:?}")
                }
            }
        }
    }

    let listed: usize = tree.hanging_nodes().len();
    let flagged = tree.nodes().iter().filter(|(_, n)| n.hanging).count();
    assert_eq!(listed, flagged, "hanging node list is out of date");
}

fn assert_registry_contiguous<T: Entity>(name: &str, registry: &Registry<T>) {
    let n = registry.len() as u32;
    let h = registry.iter().filter(|(_, e)| e.is_hanging()).count() as u32;
    let mut seen = vec![false; n as usize];
    for (_, e) in registry.iter() {
        let i = e.index();
        assert!(i < n, "{name} index {i} out of range 0..{n}");
        assert!(!seen[i as usize], "{name} index {i} assigned twice");
        seen[i as usize] = true;
        if e.is_hanging() {
            assert!(i >= n - h, "hanging {name} numbered {i} among regular ones");
        } else {
            assert!(i < n - h, "regular {name} numbered {i} among hanging ones");
        }
    }
}

/// Assert that every registry is numbered `0..n` with the hanging block
/// last.
pub fn assert_index_contiguous(tree: &Tree) {
    assert!(tree.is_numbered(), "tree has not been numbered");
    assert_registry_contiguous("node", tree.nodes());
    for axis in Axis::ALL {
        assert_registry_contiguous(&format!("{axis}-edge"), tree.edges(axis));
        assert_registry_contiguous(&format!("{axis}-face"), tree.faces(axis));
    }
}

fn assert_registry_unique<T: Entity>(name: &str, registry: &Registry<T>) {
    let mut keys = HashSet::new();
    for (id, e) in registry.iter() {
        assert!(keys.insert(e.key()), "{name} {} stored twice", e.key());
        assert_eq!(registry.find(e.key()), Some(id), "{name} {id} not found by its key");
    }
}

/// Assert that each location is stored once per kind and orientation, and
/// that every leaf corner resolves to the registered node.
pub fn assert_dedup_unique(tree: &Tree) {
    assert_registry_unique("node", tree.nodes());
    for axis in Axis::ALL {
        assert_registry_unique(&format!("{axis}-edge"), tree.edges(axis));
        assert_registry_unique(&format!("{axis}-face"), tree.faces(axis));
    }
    for (id, node) in tree.nodes().iter() {
        assert_eq!(node.key, SpatialKey::of(node.location), "node {id} key is stale");
    }
    for &leaf in tree.leaves() {
        let cell = match tree.cell(leaf) {
            Ok(c) => c,
            Err(e) => panic!("{e}"),
        };
        for &corner in cell.corners() {
            let loc = tree.nodes()[corner].location;
            assert_eq!(tree.nodes().find(SpatialKey::of(loc)), Some(corner));
        }
    }
}

/// Run every checker on a built tree.
pub fn run_full_compliance(tree: &Tree) {
    assert_leaf_partition(tree);
    assert_balanced(tree);
    assert_neighbors_settled(tree);
    assert_dedup_unique(tree);
    assert_hanging_consistent(tree);
    assert_index_contiguous(tree);
}
