//! Store and queue fixtures.
//!
//! Everything here starts from a universe of `1..=count`, the same shape
//! the server seeds at startup.

use pagesync_core::{Action, CoreConfig, ItemId, ItemUniverse, MutationQueue, QueueClass, Store};
use std::sync::Arc;

/// Creates a store over `1..=count` with an empty selection.
pub fn seeded_store(count: u64) -> Store {
    Store::new(ItemUniverse::with_range(count))
}

/// Creates a queue over `1..=count` with the default configuration.
pub fn seeded_queue(count: u64) -> Arc<MutationQueue> {
    seeded_queue_with(count, CoreConfig::default())
}

/// Creates a queue over `1..=count` with `config`.
pub fn seeded_queue_with(count: u64, config: CoreConfig) -> Arc<MutationQueue> {
    Arc::new(MutationQueue::new(seeded_store(count), config))
}

/// Enqueues `actions` and flushes every class they touch.
pub fn apply_all(queue: &MutationQueue, actions: impl IntoIterator<Item = Action>) {
    for action in actions {
        queue.enqueue(action);
    }
    queue.flush(QueueClass::Fast);
    queue.flush(QueueClass::Slow);
}

/// Creates a queue over `1..=count` whose selection is `selected`, in order.
pub fn queue_with_selection(count: u64, selected: &[ItemId]) -> Arc<MutationQueue> {
    let queue = seeded_queue(count);
    apply_all(&queue, selected.iter().copied().map(Action::select));
    queue
}
