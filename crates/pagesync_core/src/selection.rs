//! The ordered selection.

use crate::config::ReorderPolicy;
use crate::types::ItemId;
use crate::universe::ItemUniverse;
use std::collections::HashSet;

/// Ordered, deduplicated subset of the universe.
///
/// The sequence and the membership set always hold exactly the same ids.
/// Sequence order is authoritative.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    sequence: Vec<ItemId>,
    members: HashSet<ItemId>,
}

impl SelectionState {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` if it is known to the universe and not yet selected.
    ///
    /// Returns `true` if the selection changed.
    pub(crate) fn select(&mut self, id: ItemId, universe: &ItemUniverse) -> bool {
        if !universe.contains(id) || self.members.contains(&id) {
            return false;
        }
        self.members.insert(id);
        self.sequence.push(id);
        true
    }

    /// Removes `id` if selected. Returns `true` if the selection changed.
    pub(crate) fn deselect(&mut self, id: ItemId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.sequence.retain(|&selected| selected != id);
        true
    }

    /// Replaces the sequence with `ordered`, restricted to selected ids.
    ///
    /// Ids that are not selected are ignored and repeated ids keep their
    /// first position. Selected ids missing from `ordered` are handled per
    /// `policy`. Returns `true` if the sequence or the set changed.
    pub(crate) fn reorder(&mut self, ordered: &[ItemId], policy: ReorderPolicy) -> bool {
        let mut seen = HashSet::with_capacity(ordered.len().min(self.members.len()));
        let mut next: Vec<ItemId> = ordered
            .iter()
            .copied()
            .filter(|id| self.members.contains(id) && seen.insert(*id))
            .collect();

        match policy {
            ReorderPolicy::AppendOmitted => {
                next.extend(self.sequence.iter().copied().filter(|id| !seen.contains(id)));
            }
            ReorderPolicy::Truncate => {
                self.members.retain(|id| seen.contains(id));
            }
        }

        if next == self.sequence {
            return false;
        }
        self.sequence = next;
        true
    }

    /// Returns true if `id` is selected.
    pub fn contains(&self, id: ItemId) -> bool {
        self.members.contains(&id)
    }

    /// Returns the selected ids in order.
    pub fn as_slice(&self) -> &[ItemId] {
        &self.sequence
    }

    /// Iterates the selected ids in order.
    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.sequence.iter().copied()
    }

    /// Returns the number of selected ids.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
