//! Property tests for the synchronization core.

use pagesync_core::{
    page_count, Action, CoreConfig, DigestAlgorithm, ItemId, ItemUniverse, MutationQueue,
    QueueClass, Reconciler, ReorderPolicy, Side, Store, ViewProjector,
};
use proptest::prelude::*;
use std::collections::HashSet;

const UNIVERSE: u64 = 200;

fn queue_with(selected: &[ItemId], policy: ReorderPolicy) -> MutationQueue {
    let queue = MutationQueue::new(
        Store::new(ItemUniverse::with_range(UNIVERSE)),
        CoreConfig::default().with_reorder_policy(policy),
    );
    for &id in selected {
        queue.enqueue(Action::select(id));
    }
    queue.flush(QueueClass::Fast);
    queue
}

fn selection(queue: &MutationQueue) -> Vec<ItemId> {
    queue.read().selection().as_slice().to_vec()
}

fn ids() -> impl Strategy<Value = Vec<ItemId>> {
    prop::collection::vec(1..=UNIVERSE, 0..40)
}

fn policy() -> impl Strategy<Value = ReorderPolicy> {
    prop_oneof![
        Just(ReorderPolicy::AppendOmitted),
        Just(ReorderPolicy::Truncate)
    ]
}

proptest! {
    #[test]
    fn select_then_deselect_round_trips(selected in ids(), id in 1..=UNIVERSE + 10) {
        let queue = queue_with(&selected, ReorderPolicy::AppendOmitted);
        prop_assume!(!queue.read().selection().contains(id));
        let before = selection(&queue);

        queue.enqueue(Action::select(id));
        queue.flush(QueueClass::Fast);
        queue.enqueue(Action::deselect(id));
        queue.flush(QueueClass::Fast);

        prop_assert_eq!(selection(&queue), before);
    }

    #[test]
    fn reorder_is_idempotent(selected in ids(), order in ids(), policy in policy()) {
        let queue = queue_with(&selected, policy);

        queue.enqueue(Action::reorder(order.clone()));
        queue.flush(QueueClass::Fast);
        let once = selection(&queue);

        queue.enqueue(Action::reorder(order));
        let report = queue.flush(QueueClass::Fast);

        prop_assert_eq!(selection(&queue), once);
        prop_assert!(report.changed.is_empty());
    }

    #[test]
    fn selection_has_no_duplicates(actions in prop::collection::vec((0u8..3, ids()), 0..20)) {
        let queue = queue_with(&[], ReorderPolicy::Truncate);
        for (kind, ids) in actions {
            for id in ids.iter().copied() {
                match kind {
                    0 => queue.enqueue(Action::select(id)),
                    1 => queue.enqueue(Action::deselect(id)),
                    _ => queue.enqueue(Action::reorder(ids.clone())),
                };
            }
            queue.flush(QueueClass::Fast);
        }

        let store = queue.read();
        let sequence = store.selection().as_slice();
        let unique: HashSet<_> = sequence.iter().collect();
        prop_assert_eq!(unique.len(), sequence.len());
        for id in sequence {
            prop_assert!(store.selection().contains(*id));
        }
    }

    #[test]
    fn digest_is_deterministic_and_order_sensitive(ids in ids()) {
        let algorithm = DigestAlgorithm::Sha1;
        prop_assert_eq!(
            algorithm.digest(ids.iter().copied()),
            algorithm.digest(ids.iter().copied())
        );

        let mut reversed = ids.clone();
        reversed.reverse();
        if reversed != ids {
            prop_assert_ne!(
                algorithm.digest(ids.iter().copied()),
                algorithm.digest(reversed)
            );
        }

        let mut longer = ids.clone();
        longer.push(1);
        prop_assert_ne!(algorithm.digest(ids.iter().copied()), algorithm.digest(longer));
    }

    #[test]
    fn pages_concatenate_to_list(
        selected in ids(),
        search in "[0-9]{0,2}",
        page_size in 1usize..30,
    ) {
        let queue = queue_with(&selected, ReorderPolicy::AppendOmitted);
        let store = queue.read();
        let view = ViewProjector::new(&store);

        for side in Side::ALL {
            let list = view.list(side, &search);
            let pages = page_count(list.len(), page_size);

            let mut joined = Vec::new();
            for page in 0..pages {
                joined.extend(view.page(side, &search, page, page_size));
            }
            prop_assert_eq!(&joined, &list);
            prop_assert!(view.page(side, &search, pages, page_size).is_empty());
            prop_assert!(view.page(side, &search, pages + 7, page_size).is_empty());
        }
    }

    #[test]
    fn sides_partition_the_universe(selected in ids()) {
        let queue = queue_with(&selected, ReorderPolicy::AppendOmitted);
        let store = queue.read();
        let view = ViewProjector::new(&store);

        let mut all = view.list(Side::Universe, "");
        all.extend(view.list(Side::Selected, ""));
        let unique: HashSet<_> = all.iter().copied().collect();

        prop_assert_eq!(unique.len(), all.len());
        prop_assert_eq!(unique, (1..=UNIVERSE).collect::<HashSet<_>>());
    }

    #[test]
    fn empty_prefix_matches_any_collection(selected in ids()) {
        let queue = queue_with(&selected, ReorderPolicy::AppendOmitted);
        let reconciler = Reconciler::default();
        let empty = reconciler.digest(std::iter::empty());
        let store = queue.read();

        for side in Side::ALL {
            prop_assert!(reconciler.check_prefix(&store, side, "", 0, &empty).matches);
        }
    }
}

#[test]
fn selection_scenario() {
    let queue = MutationQueue::new(
        Store::new(ItemUniverse::with_range(5)),
        CoreConfig::default(),
    );

    queue.enqueue(Action::select(3));
    queue.enqueue(Action::select(5));
    queue.flush(QueueClass::Fast);
    assert_eq!(selection(&queue), vec![3, 5]);

    queue.enqueue(Action::reorder(vec![5, 3]));
    queue.flush(QueueClass::Fast);
    assert_eq!(selection(&queue), vec![5, 3]);

    queue.enqueue(Action::deselect(3));
    queue.flush(QueueClass::Fast);
    assert_eq!(selection(&queue), vec![5]);

    let store = queue.read();
    assert_eq!(
        ViewProjector::new(&store).page(Side::Selected, "", 0, 20),
        vec![5]
    );
}

#[test]
fn duplicate_selects_collapse_within_one_tick() {
    let queue = MutationQueue::new(
        Store::new(ItemUniverse::with_range(10)),
        CoreConfig::default(),
    );

    queue.enqueue(Action::select(7));
    queue.enqueue(Action::select(7));
    let report = queue.flush(QueueClass::Fast);

    assert_eq!(report.applied, 1);
    assert_eq!(selection(&queue), vec![7]);
}
