//! Deduplicating mutation queue with atomic flush.

use crate::action::{Action, DedupeKey, QueueClass};
use crate::config::CoreConfig;
use crate::store::{ChangeSet, SharedStore, Store, StoreReadGuard};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Result of submitting an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The action was queued for the next flush.
    Queued,
    /// An action with the same key is already pending; this one was dropped.
    Collapsed,
    /// A pending action with the same key was superseded by this one.
    Replaced,
    /// The queue is at its depth cap.
    Rejected,
}

impl EnqueueOutcome {
    /// Returns true if the action will take part in the next flush.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, EnqueueOutcome::Rejected)
    }
}

/// Summary of one flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushReport {
    /// Queue that was flushed.
    pub class: QueueClass,
    /// Number of actions applied.
    pub applied: usize,
    /// Number of actions that changed the store.
    pub effective: usize,
    /// Projections changed by this flush.
    pub changed: ChangeSet,
}

impl FlushReport {
    fn new(class: QueueClass) -> Self {
        Self {
            class,
            applied: 0,
            effective: 0,
            changed: ChangeSet::default(),
        }
    }

    fn record(&mut self, changes: ChangeSet) {
        self.applied += 1;
        if !changes.is_empty() {
            self.effective += 1;
            self.changed.merge(changes);
        }
    }
}

/// Pending actions of one class, in arrival order, indexed by dedupe key.
#[derive(Debug, Default)]
struct PendingQueue {
    /// Arrival slots. A replaced action leaves an empty slot behind.
    slots: Vec<Option<Action>>,
    /// Dedupe key -> slot of the pending action.
    index: HashMap<DedupeKey, usize>,
}

impl PendingQueue {
    fn push(&mut self, action: Action, max_pending: Option<usize>) -> EnqueueOutcome {
        let key = action.dedupe_key();

        if let Some(&slot) = self.index.get(&key) {
            if !action.is_last_write_wins() {
                return EnqueueOutcome::Collapsed;
            }
            // The survivor takes the later arrival position.
            self.slots[slot] = None;
            self.index.insert(key, self.slots.len());
            self.slots.push(Some(action));
            return EnqueueOutcome::Replaced;
        }

        if max_pending.is_some_and(|max| self.index.len() >= max) {
            return EnqueueOutcome::Rejected;
        }

        self.index.insert(key, self.slots.len());
        self.slots.push(Some(action));
        EnqueueOutcome::Queued
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn drain(&mut self) -> Vec<Action> {
        let pending = std::mem::take(self);
        pending.slots.into_iter().flatten().collect()
    }
}

/// Accepts mutation requests and applies them to the store at flush time.
///
/// Actions are split into a fast queue (select, deselect, reorder) and a
/// slow queue (add), each flushed independently. Within a queue, repeated
/// submissions with the same dedupe key collapse into one effect, except
/// reorder where the latest submission wins.
///
/// `flush` holds the store write lock while draining and applying, so
/// readers observe either the previous committed state or the whole batch.
/// The dedupe index is swapped out with the batch: a resubmission arriving
/// while a batch is being applied lands in the next window.
pub struct MutationQueue {
    store: Arc<SharedStore>,
    fast: Mutex<PendingQueue>,
    slow: Mutex<PendingQueue>,
    config: CoreConfig,
}

impl MutationQueue {
    /// Creates a queue that owns `store`.
    pub fn new(store: Store, config: CoreConfig) -> Self {
        Self {
            store: Arc::new(SharedStore::new(store)),
            fast: Mutex::new(PendingQueue::default()),
            slow: Mutex::new(PendingQueue::default()),
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Returns read access to the last committed state.
    pub fn read(&self) -> StoreReadGuard<'_> {
        self.store.read()
    }

    /// Returns the shared store.
    pub fn store(&self) -> &Arc<SharedStore> {
        &self.store
    }

    fn pending_queue(&self, class: QueueClass) -> &Mutex<PendingQueue> {
        match class {
            QueueClass::Fast => &self.fast,
            QueueClass::Slow => &self.slow,
        }
    }

    /// Submits an action for the next flush of its class.
    pub fn enqueue(&self, action: Action) -> EnqueueOutcome {
        let class = action.class();
        let outcome = self
            .pending_queue(class)
            .lock()
            .push(action, self.config.max_pending);

        if outcome == EnqueueOutcome::Rejected {
            tracing::warn!(?class, "pending queue full, action rejected");
        }
        outcome
    }

    /// Returns the number of distinct pending actions of `class`.
    pub fn pending(&self, class: QueueClass) -> usize {
        self.pending_queue(class).lock().len()
    }

    /// Applies every pending action of `class` in arrival order.
    pub fn flush(&self, class: QueueClass) -> FlushReport {
        let mut report = FlushReport::new(class);
        let mut store = self.store.write();
        let batch = self.pending_queue(class).lock().drain();

        for action in &batch {
            let changes = store.apply(action, self.config.reorder_policy);
            report.record(changes);
        }
        drop(store);

        if report.applied > 0 {
            tracing::debug!(
                ?class,
                applied = report.applied,
                effective = report.effective,
                "flushed pending actions"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReorderPolicy;
    use crate::types::Side;
    use crate::universe::ItemUniverse;

    fn create_queue(count: u64) -> MutationQueue {
        MutationQueue::new(
            Store::new(ItemUniverse::with_range(count)),
            CoreConfig::default(),
        )
    }

    #[test]
    fn nothing_visible_before_flush() {
        let queue = create_queue(10);
        assert_eq!(queue.enqueue(Action::select(3)), EnqueueOutcome::Queued);

        assert!(queue.read().selection().is_empty());
        queue.flush(QueueClass::Fast);
        assert_eq!(queue.read().selection().as_slice(), &[3]);
    }

    #[test]
    fn duplicate_select_applies_once() {
        let queue = create_queue(10);
        assert_eq!(queue.enqueue(Action::select(7)), EnqueueOutcome::Queued);
        assert_eq!(queue.enqueue(Action::select(7)), EnqueueOutcome::Collapsed);
        assert_eq!(queue.pending(QueueClass::Fast), 1);

        let report = queue.flush(QueueClass::Fast);
        assert_eq!(report.applied, 1);
        assert_eq!(report.effective, 1);
        assert_eq!(queue.read().selection().as_slice(), &[7]);
    }

    #[test]
    fn latest_reorder_wins_and_moves_last() {
        let queue = create_queue(10);
        queue.enqueue(Action::select(1));
        queue.enqueue(Action::select(2));
        queue.flush(QueueClass::Fast);

        assert_eq!(
            queue.enqueue(Action::reorder(vec![1, 2])),
            EnqueueOutcome::Queued
        );
        queue.enqueue(Action::select(3));
        assert_eq!(
            queue.enqueue(Action::reorder(vec![3, 2, 1])),
            EnqueueOutcome::Replaced
        );
        assert_eq!(queue.pending(QueueClass::Fast), 2);

        let report = queue.flush(QueueClass::Fast);
        assert_eq!(report.applied, 2);
        assert_eq!(queue.read().selection().as_slice(), &[3, 2, 1]);
    }

    #[test]
    fn classes_flush_independently() {
        let queue = create_queue(10);
        queue.enqueue(Action::add(11));
        queue.enqueue(Action::select(11));

        // The select runs before the add lands and is ignored.
        let report = queue.flush(QueueClass::Fast);
        assert_eq!(report.effective, 0);
        assert!(report.changed.is_empty());
        assert_eq!(queue.pending(QueueClass::Slow), 1);

        let report = queue.flush(QueueClass::Slow);
        assert_eq!(report.changed, ChangeSet::only(Side::Universe));
        assert!(queue.read().universe().contains(11));
        assert!(queue.read().selection().is_empty());
    }

    #[test]
    fn keys_are_released_after_flush() {
        let queue = create_queue(10);
        queue.enqueue(Action::select(4));
        queue.flush(QueueClass::Fast);
        queue.enqueue(Action::deselect(4));
        queue.flush(QueueClass::Fast);

        assert_eq!(queue.enqueue(Action::select(4)), EnqueueOutcome::Queued);
        queue.flush(QueueClass::Fast);
        assert_eq!(queue.read().selection().as_slice(), &[4]);
    }

    #[test]
    fn drain_releases_keys() {
        let mut pending = PendingQueue::default();
        assert_eq!(pending.push(Action::select(4), None), EnqueueOutcome::Queued);
        assert_eq!(pending.push(Action::select(4), None), EnqueueOutcome::Collapsed);

        let batch = pending.drain();
        assert_eq!(batch, vec![Action::select(4)]);
        assert_eq!(pending.len(), 0);

        // A resubmission after the drain belongs to the next window.
        assert_eq!(pending.push(Action::select(4), None), EnqueueOutcome::Queued);
        assert_eq!(pending.drain(), vec![Action::select(4)]);
    }

    #[test]
    fn submissions_while_flush_waits_are_not_lost() {
        let queue = Arc::new(create_queue(10));
        queue.enqueue(Action::select(4));

        let reader = queue.read();
        let flusher = {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || queue.flush(QueueClass::Fast))
        };
        std::thread::sleep(std::time::Duration::from_millis(50));

        // The flush cannot drain while the read lock is held.
        assert_eq!(queue.enqueue(Action::select(4)), EnqueueOutcome::Collapsed);
        assert_eq!(queue.enqueue(Action::select(5)), EnqueueOutcome::Queued);
        drop(reader);

        let report = flusher.join().unwrap();
        assert_eq!(report.applied, 2);
        assert_eq!(queue.pending(QueueClass::Fast), 0);
        assert_eq!(queue.read().selection().as_slice(), &[4, 5]);

        assert_eq!(queue.enqueue(Action::deselect(4)), EnqueueOutcome::Queued);
        queue.flush(QueueClass::Fast);
        assert_eq!(queue.read().selection().as_slice(), &[5]);
    }

    #[test]
    fn arrival_order_is_preserved() {
        let queue = create_queue(10);
        queue.enqueue(Action::select(5));
        queue.enqueue(Action::deselect(5));
        queue.enqueue(Action::select(5));

        // Keys are (kind, id): the second select collapses into the first.
        let report = queue.flush(QueueClass::Fast);
        assert_eq!(report.applied, 2);
        assert!(queue.read().selection().is_empty());
        assert_eq!(report.changed, ChangeSet::both());
    }

    #[test]
    fn depth_cap_rejects_new_keys_only() {
        let queue = MutationQueue::new(
            Store::new(ItemUniverse::with_range(10)),
            CoreConfig::default().with_max_pending(2),
        );
        assert_eq!(queue.enqueue(Action::select(1)), EnqueueOutcome::Queued);
        assert_eq!(
            queue.enqueue(Action::reorder(vec![1])),
            EnqueueOutcome::Queued
        );
        assert_eq!(queue.enqueue(Action::select(2)), EnqueueOutcome::Rejected);
        assert_eq!(queue.enqueue(Action::select(1)), EnqueueOutcome::Collapsed);
        assert_eq!(
            queue.enqueue(Action::reorder(vec![])),
            EnqueueOutcome::Replaced
        );
        // The slow queue has its own budget.
        assert_eq!(queue.enqueue(Action::add(20)), EnqueueOutcome::Queued);
    }

    #[test]
    fn empty_flush_reports_nothing() {
        let queue = create_queue(3);
        let report = queue.flush(QueueClass::Fast);
        assert_eq!(report.applied, 0);
        assert!(report.changed.is_empty());
    }

    #[test]
    fn truncate_policy_is_honored() {
        let queue = MutationQueue::new(
            Store::new(ItemUniverse::with_range(10)),
            CoreConfig::default().with_reorder_policy(ReorderPolicy::Truncate),
        );
        queue.enqueue(Action::select(1));
        queue.enqueue(Action::select(2));
        queue.flush(QueueClass::Fast);

        queue.enqueue(Action::reorder(vec![2]));
        queue.flush(QueueClass::Fast);
        assert_eq!(queue.read().selection().as_slice(), &[2]);
    }

    #[test]
    fn concurrent_enqueue() {
        let queue = Arc::new(create_queue(1000));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    for id in 1..=100u64 {
                        queue.enqueue(Action::select(id + t * 100));
                        queue.enqueue(Action::select(id));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // 1..=400 distinct selects, duplicates of 1..=100 collapsed.
        assert_eq!(queue.pending(QueueClass::Fast), 400);
        queue.flush(QueueClass::Fast);
        assert_eq!(queue.read().selection().len(), 400);
    }
}
