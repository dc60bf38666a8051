//! Property-based test generators using proptest.
//!
//! Ids are drawn from a small range on purpose so that generated action
//! streams hit the same items repeatedly.

use pagesync_core::{Action, ItemId};
use proptest::prelude::*;

/// Upper bound of generated ids; pair with a universe of `1..=ID_RANGE`.
pub const ID_RANGE: ItemId = 64;

/// Strategy for ids inside the seeded universe.
pub fn id_strategy() -> impl Strategy<Value = ItemId> {
    1..=ID_RANGE
}

/// Strategy for ids that may fall outside the seeded universe.
pub fn any_id_strategy() -> impl Strategy<Value = ItemId> {
    prop_oneof![
        4 => id_strategy(),
        1 => (ID_RANGE + 1)..=(ID_RANGE * 2),
    ]
}

/// Strategy for reorder payloads, duplicates and unknown ids included.
pub fn ordering_strategy() -> impl Strategy<Value = Vec<ItemId>> {
    prop::collection::vec(any_id_strategy(), 0..24)
}

/// Strategy for a single action of any kind.
pub fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => any_id_strategy().prop_map(Action::select),
        3 => any_id_strategy().prop_map(Action::deselect),
        1 => ordering_strategy().prop_map(Action::reorder),
        1 => any_id_strategy().prop_map(Action::add),
    ]
}

/// Strategy for a stream of actions.
pub fn actions_strategy(max_len: usize) -> impl Strategy<Value = Vec<Action>> {
    prop::collection::vec(action_strategy(), 0..max_len)
}

/// Strategy for search needles, empty included.
pub fn search_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => Just(String::new()),
        3 => prop::string::string_regex("[0-9]{1,2}").expect("Invalid regex"),
    ]
}

/// Strategy for page sizes.
pub fn page_size_strategy() -> impl Strategy<Value = usize> {
    1usize..=32
}
