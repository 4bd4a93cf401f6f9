//! Insertion-ordered get-or-create registry.
//!
//! [`Registry`] stores entities in an [`IndexMap`] keyed by spatial key.
//! Entities are never removed, so the map position of an entity is a
//! stable handle and doubles as its arena slot.

use crate::entity::Entity;
use indexmap::map::Entry;
use indexmap::IndexMap;
use octmesh_core::{EdgeId, FaceId, NodeId, SpatialKey};
use std::fmt;
use std::ops::{Index, IndexMut};

/// A registry handle convertible to and from an arena position.
pub trait Handle: Copy + Eq + fmt::Debug + fmt::Display {
    /// Handle for arena position `index`.
    fn from_index(index: usize) -> Self;

    /// Arena position of this handle.
    fn to_index(self) -> usize;
}

impl Handle for NodeId {
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    fn to_index(self) -> usize {
        self.index()
    }
}

impl Handle for EdgeId {
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    fn to_index(self) -> usize {
        self.index()
    }
}

impl Handle for FaceId {
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    fn to_index(self) -> usize {
        self.index()
    }
}

/// Deduplicating arena of entities of one kind and orientation.
#[derive(Clone, Debug)]
pub struct Registry<T> {
    entries: IndexMap<SpatialKey, T>,
}

impl<T: Entity> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Return the entity stored under `key`, creating it with `make` if
    /// absent. The boolean is `true` when a new entity was inserted.
    pub fn get_or_insert_with(
        &mut self,
        key: SpatialKey,
        make: impl FnOnce() -> T,
    ) -> (T::Id, bool) {
        match self.entries.entry(key) {
            Entry::Occupied(o) => (T::Id::from_index(o.index()), false),
            Entry::Vacant(v) => {
                let id = T::Id::from_index(v.index());
                v.insert(make());
                (id, true)
            }
        }
    }

    /// Handle of the entity stored under `key`.
    pub fn find(&self, key: SpatialKey) -> Option<T::Id> {
        self.entries.get_index_of(&key).map(T::Id::from_index)
    }

    /// Whether an entity is stored under `key`.
    pub fn contains_key(&self, key: SpatialKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Entity for a handle, if the handle is in range.
    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.entries.get_index(id.to_index()).map(|(_, e)| e)
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(handle, entity)` in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (T::Id, &T)> + '_ {
        self.entries
            .values()
            .enumerate()
            .map(|(i, e)| (T::Id::from_index(i), e))
    }

    /// Iterate mutably over entities in creation order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.entries.values_mut()
    }

    /// Handles of every entity flagged hanging, in creation order.
    pub fn hanging_ids(&self) -> Vec<T::Id> {
        self.iter()
            .filter(|(_, e)| e.is_hanging())
            .map(|(id, _)| id)
            .collect()
    }
}

impl<T: Entity> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Index<T::Id> for Registry<T> {
    type Output = T;

    fn index(&self, id: T::Id) -> &T {
        &self.entries[id.to_index()]
    }
}

impl<T: Entity> IndexMut<T::Id> for Registry<T> {
    fn index_mut(&mut self, id: T::Id) -> &mut T {
        &mut self.entries[id.to_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Node;
    use proptest::prelude::*;

    fn node_at(reg: &mut Registry<Node>, loc: [i64; 3]) -> (NodeId, bool) {
        reg.get_or_insert_with(SpatialKey::of(loc), || Node::new(loc))
    }

    #[test]
    fn second_request_returns_existing() {
        let mut reg = Registry::new();
        let (a, created_a) = node_at(&mut reg, [2, 2, 0]);
        let (b, created_b) = node_at(&mut reg, [2, 2, 0]);
        assert!(created_a);
        assert!(!created_b);
        assert_eq!(a, b);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn handles_follow_creation_order() {
        let mut reg = Registry::new();
        let (a, _) = node_at(&mut reg, [4, 0, 0]);
        let (b, _) = node_at(&mut reg, [0, 4, 0]);
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
        let order: Vec<_> = reg.iter().map(|(id, n)| (id, n.location)).collect();
        assert_eq!(order, vec![(a, [4, 0, 0]), (b, [0, 4, 0])]);
    }

    #[test]
    fn find_and_index_agree() {
        let mut reg = Registry::new();
        let (a, _) = node_at(&mut reg, [6, 2, 0]);
        let key = SpatialKey::of([6, 2, 0]);
        assert_eq!(reg.find(key), Some(a));
        assert!(reg.contains_key(key));
        assert_eq!(reg[a].location, [6, 2, 0]);
        assert!(reg.get(NodeId(9)).is_none());
        assert!(reg.find(SpatialKey::of([0, 0, 0])).is_none());
    }

    #[test]
    fn hanging_ids_filters_in_order() {
        let mut reg = Registry::new();
        let (a, _) = node_at(&mut reg, [0, 0, 0]);
        let (b, _) = node_at(&mut reg, [2, 0, 0]);
        let (c, _) = node_at(&mut reg, [4, 0, 0]);
        reg[c].hanging = true;
        reg[a].hanging = true;
        assert_eq!(reg.hanging_ids(), vec![a, c]);
        assert!(!reg[b].hanging);
    }

    proptest! {
        #[test]
        fn one_entity_per_location(
            locs in prop::collection::vec(prop::array::uniform3(0i64..16), 1..64)
        ) {
            let mut reg = Registry::new();
            let mut seen = std::collections::HashMap::new();
            for loc in &locs {
                let (id, _) = node_at(&mut reg, *loc);
                let prior = *seen.entry(*loc).or_insert(id);
                prop_assert_eq!(prior, id);
            }
            prop_assert_eq!(reg.len(), seen.len());
        }
    }
}
