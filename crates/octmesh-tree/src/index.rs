//! Degree-of-freedom numbering.
//!
//! In every registry the regular entities are numbered `0..k` in creation
//! order and the hanging ones `k..n` after them, so a solver can treat the
//! leading block as unknowns and the trailing block as constraints.

use crate::tree::{Stage, Tree};
use octmesh_core::{Axis, MeshError};
use octmesh_registry::{Entity, Registry};
use tracing::{debug, info_span};

/// Number one registry. Returns the count of regular entities.
fn number_registry<T: Entity>(registry: &mut Registry<T>) -> u32 {
    let regular = registry.iter().filter(|(_, e)| !e.is_hanging()).count() as u32;
    let (mut next_regular, mut next_hanging) = (0, regular);
    for entity in registry.values_mut() {
        let slot = if entity.is_hanging() {
            &mut next_hanging
        } else {
            &mut next_regular
        };
        entity.set_index(*slot);
        *slot += 1;
    }
    regular
}

impl Tree {
    /// Assign contiguous indices to every node, edge, face, and leaf.
    ///
    /// Requires [`resolve`](Self::resolve). Leaves are numbered by their
    /// position in the leaf list.
    pub fn number(&mut self) -> Result<(), MeshError> {
        if self.stage < Stage::Resolved {
            return Err(MeshError::StageNotReached { required: "resolve" });
        }
        let _span = info_span!("number").entered();

        let nodes = number_registry(self.store.nodes_mut());
        for axis in Axis::ALL {
            number_registry(self.store.edges_mut(axis));
            number_registry(self.store.faces_mut(axis));
        }
        for (i, &id) in self.leaves.iter().enumerate() {
            self.cells[id.index()].index = i as u32;
        }

        self.stage = Stage::Numbered;
        debug!(
            regular_nodes = nodes,
            hanging_nodes = self.hanging.nodes.len(),
            leaves = self.leaves.len(),
            "indices assigned"
        );
        Ok(())
    }
}
