//! Mutation requests and their dedupe identities.

use crate::types::ItemId;

/// Which pending queue (and flush timer) an action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueClass {
    /// Interactive changes: select, deselect, reorder.
    Fast,
    /// Universe growth: add.
    Slow,
}

/// The effect requested by a viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Append an id to the selection.
    Select(ItemId),
    /// Remove an id from the selection.
    Deselect(ItemId),
    /// Replace the selection order.
    Reorder(Vec<ItemId>),
    /// Add an id to the universe.
    Add(ItemId),
}

/// Identity under which repeated pending actions collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DedupeKey {
    /// `(select, id)`.
    Select(ItemId),
    /// `(deselect, id)`.
    Deselect(ItemId),
    /// Constant key: the latest reorder wins.
    Reorder,
    /// `(add, id)`.
    Add(ItemId),
}

/// A queued mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    kind: ActionKind,
}

impl Action {
    /// Creates a select action.
    pub fn select(id: ItemId) -> Self {
        Self::from(ActionKind::Select(id))
    }

    /// Creates a deselect action.
    pub fn deselect(id: ItemId) -> Self {
        Self::from(ActionKind::Deselect(id))
    }

    /// Creates a reorder action.
    pub fn reorder(ordered_ids: Vec<ItemId>) -> Self {
        Self::from(ActionKind::Reorder(ordered_ids))
    }

    /// Creates an add action.
    pub fn add(id: ItemId) -> Self {
        Self::from(ActionKind::Add(id))
    }

    /// Returns the requested effect.
    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    /// Returns the dedupe identity.
    pub fn dedupe_key(&self) -> DedupeKey {
        match self.kind {
            ActionKind::Select(id) => DedupeKey::Select(id),
            ActionKind::Deselect(id) => DedupeKey::Deselect(id),
            ActionKind::Reorder(_) => DedupeKey::Reorder,
            ActionKind::Add(id) => DedupeKey::Add(id),
        }
    }

    /// Returns the queue this action is flushed from.
    pub fn class(&self) -> QueueClass {
        match self.kind {
            ActionKind::Add(_) => QueueClass::Slow,
            _ => QueueClass::Fast,
        }
    }

    /// Returns true if a newer action with the same key replaces this one
    /// instead of being dropped.
    pub fn is_last_write_wins(&self) -> bool {
        matches!(self.kind, ActionKind::Reorder(_))
    }
}

impl From<ActionKind> for Action {
    fn from(kind: ActionKind) -> Self {
        Self { kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupe_keys() {
        assert_eq!(Action::select(7).dedupe_key(), DedupeKey::Select(7));
        assert_eq!(Action::deselect(7).dedupe_key(), DedupeKey::Deselect(7));
        assert_ne!(
            Action::select(7).dedupe_key(),
            Action::deselect(7).dedupe_key()
        );
        assert_eq!(
            Action::reorder(vec![1, 2]).dedupe_key(),
            Action::reorder(vec![2, 1]).dedupe_key()
        );
        assert_eq!(Action::add(7).dedupe_key(), DedupeKey::Add(7));
    }

    #[test]
    fn queue_classes() {
        assert_eq!(Action::select(1).class(), QueueClass::Fast);
        assert_eq!(Action::deselect(1).class(), QueueClass::Fast);
        assert_eq!(Action::reorder(vec![]).class(), QueueClass::Fast);
        assert_eq!(Action::add(1).class(), QueueClass::Slow);
    }
}
