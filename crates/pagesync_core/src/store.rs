//! The single authoritative store.

use crate::action::{Action, ActionKind};
use crate::config::ReorderPolicy;
use crate::selection::SelectionState;
use crate::types::Side;
use crate::universe::ItemUniverse;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Read access to the last committed store state.
pub type StoreReadGuard<'a> = RwLockReadGuard<'a, Store>;

/// Which projected collections a mutation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// The universe projection changed.
    pub universe: bool,
    /// The selected projection changed.
    pub selected: bool,
}

impl ChangeSet {
    /// Returns a change set touching both sides.
    pub fn both() -> Self {
        Self {
            universe: true,
            selected: true,
        }
    }

    /// Returns a change set touching only `side`.
    pub fn only(side: Side) -> Self {
        match side {
            Side::Universe => Self {
                universe: true,
                selected: false,
            },
            Side::Selected => Self {
                universe: false,
                selected: true,
            },
        }
    }

    /// Folds another change set into this one.
    pub fn merge(&mut self, other: ChangeSet) {
        self.universe |= other.universe;
        self.selected |= other.selected;
    }

    /// Returns true if nothing changed.
    pub fn is_empty(&self) -> bool {
        !self.universe && !self.selected
    }

    /// Returns true if `side` changed.
    pub fn contains(&self, side: Side) -> bool {
        match side {
            Side::Universe => self.universe,
            Side::Selected => self.selected,
        }
    }

    /// Iterates the changed sides, universe first.
    pub fn sides(&self) -> impl Iterator<Item = Side> + '_ {
        Side::ALL.into_iter().filter(|side| self.contains(*side))
    }
}

/// Universe and selection, mutated together.
#[derive(Debug, Clone, Default)]
pub struct Store {
    universe: ItemUniverse,
    selection: SelectionState,
}

impl Store {
    /// Creates a store over the given universe with an empty selection.
    pub fn new(universe: ItemUniverse) -> Self {
        Self {
            universe,
            selection: SelectionState::new(),
        }
    }

    /// Returns the universe.
    pub fn universe(&self) -> &ItemUniverse {
        &self.universe
    }

    /// Returns the selection.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Applies one action and reports which projections it changed.
    pub(crate) fn apply(&mut self, action: &Action, policy: ReorderPolicy) -> ChangeSet {
        match action.kind() {
            ActionKind::Select(id) => {
                if self.selection.select(*id, &self.universe) {
                    ChangeSet::both()
                } else {
                    ChangeSet::default()
                }
            }
            ActionKind::Deselect(id) => {
                if self.selection.deselect(*id) {
                    ChangeSet::both()
                } else {
                    ChangeSet::default()
                }
            }
            ActionKind::Reorder(ordered) => {
                let before = self.selection.len();
                if !self.selection.reorder(ordered, policy) {
                    ChangeSet::default()
                } else if self.selection.len() != before {
                    // Truncated ids return to the universe projection.
                    ChangeSet::both()
                } else {
                    ChangeSet::only(Side::Selected)
                }
            }
            ActionKind::Add(id) => {
                if self.universe.add(*id) {
                    ChangeSet::only(Side::Universe)
                } else {
                    ChangeSet::default()
                }
            }
        }
    }
}

/// A store shared between the flush step and concurrent readers.
///
/// Readers take the read lock for the duration of one view computation.
/// Only `MutationQueue::flush` takes the write lock.
#[derive(Debug, Default)]
pub struct SharedStore {
    inner: RwLock<Store>,
}

impl SharedStore {
    /// Wraps a store.
    pub fn new(store: Store) -> Self {
        Self {
            inner: RwLock::new(store),
        }
    }

    /// Returns read access to the committed state.
    pub fn read(&self) -> StoreReadGuard<'_> {
        self.inner.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.inner.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_and_deselect_touch_both_sides() {
        let mut store = Store::new(ItemUniverse::with_range(5));
        let policy = ReorderPolicy::AppendOmitted;

        assert_eq!(store.apply(&Action::select(2), policy), ChangeSet::both());
        assert!(store.apply(&Action::select(2), policy).is_empty());
        assert!(store.apply(&Action::select(99), policy).is_empty());
        assert_eq!(store.apply(&Action::deselect(2), policy), ChangeSet::both());
        assert!(store.apply(&Action::deselect(2), policy).is_empty());
    }

    #[test]
    fn reorder_touches_selected_only() {
        let mut store = Store::new(ItemUniverse::with_range(5));
        let policy = ReorderPolicy::AppendOmitted;
        store.apply(&Action::select(1), policy);
        store.apply(&Action::select(2), policy);

        let changes = store.apply(&Action::reorder(vec![2, 1]), policy);
        assert_eq!(changes, ChangeSet::only(Side::Selected));
        assert_eq!(store.selection().as_slice(), &[2, 1]);
    }

    #[test]
    fn truncating_reorder_touches_both_sides() {
        let mut store = Store::new(ItemUniverse::with_range(5));
        let policy = ReorderPolicy::Truncate;
        store.apply(&Action::select(1), policy);
        store.apply(&Action::select(2), policy);

        let changes = store.apply(&Action::reorder(vec![2]), policy);
        assert_eq!(changes, ChangeSet::both());
    }

    #[test]
    fn add_touches_universe_only() {
        let mut store = Store::new(ItemUniverse::with_range(5));
        let policy = ReorderPolicy::AppendOmitted;

        assert_eq!(
            store.apply(&Action::add(6), policy),
            ChangeSet::only(Side::Universe)
        );
        assert!(store.apply(&Action::add(6), policy).is_empty());
        assert!(store.universe().contains(6));
    }

    #[test]
    fn change_set_sides() {
        let mut changes = ChangeSet::default();
        assert_eq!(changes.sides().count(), 0);

        changes.merge(ChangeSet::only(Side::Selected));
        assert_eq!(changes.sides().collect::<Vec<_>>(), vec![Side::Selected]);

        changes.merge(ChangeSet::only(Side::Universe));
        assert_eq!(
            changes.sides().collect::<Vec<_>>(),
            vec![Side::Universe, Side::Selected]
        );
    }
}
