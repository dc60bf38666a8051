//! Fan-out of change notifications to connected viewers.

use pagesync_core::{ChangeSet, Side};
use pagesync_protocol::Outbound;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Identifier of a registered connection.
pub type ConnectionId = u64;

/// Registry of live connections and their outbound queues.
///
/// Each connection registers the sender half of its outbound queue, the
/// same queue its replies go through, so per-connection order holds.
/// Delivery is best-effort:
/// - a full queue skips the notification
/// - a closed queue unregisters the connection
///
/// A viewer that misses a notification catches up at its next prefix check.
pub struct Broadcaster {
    next_id: AtomicU64,
    subscribers: RwLock<HashMap<ConnectionId, mpsc::Sender<Outbound>>>,
}

impl Broadcaster {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a connection's outbound queue.
    pub fn register(&self, sender: mpsc::Sender<Outbound>) -> ConnectionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.write().insert(id, sender);
        id
    }

    /// Removes a connection. Returns false if it was not registered.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        self.subscribers.write().remove(&id).is_some()
    }

    /// Returns the number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Sends `LIST_UPDATED` for `side` to every connection.
    ///
    /// Returns the number of connections the signal was queued for.
    pub fn notify(&self, side: Side) -> usize {
        let message = Outbound::ListChanged { side };
        let mut delivered = 0;
        let mut closed = Vec::new();

        for (id, sender) in self.subscribers.read().iter() {
            match sender.try_send(message.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::debug!(connection = id, %side, "outbound queue full, notification skipped");
                }
                Err(TrySendError::Closed(_)) => closed.push(*id),
            }
        }

        if !closed.is_empty() {
            let mut subscribers = self.subscribers.write();
            for id in closed {
                subscribers.remove(&id);
                tracing::debug!(connection = id, "pruned closed connection");
            }
        }

        delivered
    }

    /// Notifies every side in `changes`, once each.
    pub fn notify_changes(&self, changes: ChangeSet) -> usize {
        changes.sides().map(|side| self.notify(side)).sum()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}
