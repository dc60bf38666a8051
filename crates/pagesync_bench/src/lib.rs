//! Shared setup for the PageSync benchmarks.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use pagesync_core::{Action, CoreConfig, ItemId, ItemUniverse, MutationQueue, QueueClass, Store};

/// Universe sizes the benchmarks sweep.
pub const UNIVERSE_SIZES: [u64; 3] = [10_000, 100_000, 1_000_000];

/// Builds a queue over `1..=universe` with every `stride`-th id selected.
pub fn queue_with_stride(universe: u64, stride: u64) -> MutationQueue {
    let queue = MutationQueue::new(
        Store::new(ItemUniverse::with_range(universe)),
        CoreConfig::default(),
    );
    for id in (1..=universe).step_by(stride.max(1) as usize) {
        queue.enqueue(Action::select(id));
    }
    queue.flush(QueueClass::Fast);
    queue
}

/// Returns the ids of the `page`-th page of `1..`, as a fresh viewer would hold them.
pub fn held_page(page: usize, page_size: usize) -> Vec<ItemId> {
    let start = (page * page_size) as ItemId + 1;
    (start..start + page_size as ItemId).collect()
}
