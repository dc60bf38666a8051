//! The pool of known item identifiers.

use crate::types::ItemId;
use std::collections::HashSet;

/// Growable set of item identifiers.
///
/// Membership is O(1). Enumeration follows insertion order, which stays
/// stable for as long as the universe is not mutated. There is no removal.
#[derive(Debug, Clone, Default)]
pub struct ItemUniverse {
    /// Ids in insertion order.
    order: Vec<ItemId>,
    /// Membership index over `order`.
    members: HashSet<ItemId>,
}

impl ItemUniverse {
    /// Creates an empty universe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a universe seeded with the given ids, in order.
    pub fn from_ids(ids: impl IntoIterator<Item = ItemId>) -> Self {
        let mut universe = Self::new();
        for id in ids {
            universe.add(id);
        }
        universe
    }

    /// Creates a universe holding `1..=count`.
    pub fn with_range(count: u64) -> Self {
        let capacity = usize::try_from(count).unwrap_or(usize::MAX);
        let mut universe = Self {
            order: Vec::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        };
        for id in 1..=count {
            universe.add(id);
        }
        universe
    }

    /// Inserts an id. Returns `true` if it was not known before.
    pub(crate) fn add(&mut self, id: ItemId) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    /// Returns true if the id is known.
    pub fn contains(&self, id: ItemId) -> bool {
        self.members.contains(&id)
    }

    /// Iterates ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.order.iter().copied()
    }

    /// Returns the number of known ids.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no ids are known.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let mut universe = ItemUniverse::new();
        assert!(universe.add(7));
        assert!(!universe.add(7));
        assert_eq!(universe.len(), 1);
        assert!(universe.contains(7));
        assert!(!universe.contains(8));
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut universe = ItemUniverse::with_range(3);
        universe.add(100);
        universe.add(0);
        assert_eq!(universe.iter().collect::<Vec<_>>(), vec![1, 2, 3, 100, 0]);
    }

    #[test]
    fn from_ids_skips_duplicates() {
        let universe = ItemUniverse::from_ids([5, 1, 5, 2]);
        assert_eq!(universe.iter().collect::<Vec<_>>(), vec![5, 1, 2]);
    }

    #[test]
    fn empty_range() {
        let universe = ItemUniverse::with_range(0);
        assert!(universe.is_empty());
    }
}
