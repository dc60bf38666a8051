//! Flush timers.

use crate::broadcaster::Broadcaster;
use pagesync_core::{FlushReport, MutationQueue, QueueClass};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Drives the two flush timers and fans out change notifications.
///
/// The fast timer flushes select, deselect and reorder; the slow timer
/// flushes add. Each tick emits at most one notification per changed side,
/// however many actions the flush folded together.
pub struct Scheduler {
    queue: Arc<MutationQueue>,
    broadcaster: Arc<Broadcaster>,
    fast_interval: Duration,
    slow_interval: Duration,
}

impl Scheduler {
    /// Creates a scheduler. Timers do not run until `start`.
    pub fn new(
        queue: Arc<MutationQueue>,
        broadcaster: Arc<Broadcaster>,
        fast_interval: Duration,
        slow_interval: Duration,
    ) -> Self {
        Self {
            queue,
            broadcaster,
            fast_interval,
            slow_interval,
        }
    }

    /// Returns the flush period of `class`.
    pub fn interval(&self, class: QueueClass) -> Duration {
        match class {
            QueueClass::Fast => self.fast_interval,
            QueueClass::Slow => self.slow_interval,
        }
    }

    /// Flushes `class` once and notifies viewers of the changed sides.
    pub fn tick(&self, class: QueueClass) -> FlushReport {
        let report = self.queue.flush(class);
        if !report.changed.is_empty() {
            let delivered = self.broadcaster.notify_changes(report.changed);
            tracing::debug!(
                ?class,
                effective = report.effective,
                delivered,
                "change notifications sent"
            );
        }
        report
    }

    /// Spawns both timers on the current tokio runtime.
    pub fn start(self: Arc<Self>) -> SchedulerHandle {
        let (shutdown, _) = watch::channel(false);
        let tasks = [QueueClass::Fast, QueueClass::Slow]
            .into_iter()
            .map(|class| {
                let scheduler = Arc::clone(&self);
                let stop = shutdown.subscribe();
                tokio::spawn(async move { scheduler.run(class, stop).await })
            })
            .collect();

        tracing::debug!(
            fast = ?self.fast_interval,
            slow = ?self.slow_interval,
            "flush timers started"
        );
        SchedulerHandle { shutdown, tasks }
    }

    async fn run(&self, class: QueueClass, mut stop: watch::Receiver<bool>) {
        let period = self.interval(class);
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick(class);
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!(?class, "flush timer stopped");
    }
}

/// Running timers. Dropping the handle also stops them.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Returns true while at least one timer task is alive.
    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|task| !task.is_finished())
    }

    /// Stops both timers and waits for them to exit.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "flush timer task failed");
            }
        }
    }
}
