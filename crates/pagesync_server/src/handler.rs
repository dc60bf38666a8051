//! Request handlers for viewer messages.

use crate::config::ServerConfig;
use pagesync_core::{Action, EnqueueOutcome, MutationQueue, Reconciler, Side};
use pagesync_protocol::{decode_inbound, Inbound, Outbound};
use std::sync::Arc;

/// Context for request handling.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// Mutation queue owning the store (shared with the scheduler).
    pub queue: Arc<MutationQueue>,
    /// Digest checks against the committed state.
    pub reconciler: Reconciler,
}

impl HandlerContext {
    /// Creates a new handler context.
    pub fn new(config: ServerConfig, queue: Arc<MutationQueue>) -> Self {
        let reconciler = Reconciler::new(queue.config());
        Self {
            config,
            queue,
            reconciler,
        }
    }
}

/// Handler for viewer messages.
///
/// Reads run against the last committed state. Mutations are only queued;
/// their effect shows after the next tick of their timer.
#[derive(Clone)]
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// Decodes and handles one text frame.
    ///
    /// Unknown message types are ignored without reply. Malformed messages
    /// are dropped, or answered with `REJECTED` when enabled.
    pub fn handle_text(&self, text: &str) -> Option<Outbound> {
        match decode_inbound(text) {
            Ok(message) => self.handle(message),
            Err(err) if err.is_unknown_type() => {
                tracing::debug!(error = %err, "ignoring message");
                None
            }
            Err(err) => {
                tracing::debug!(error = %err, "dropping malformed message");
                self.reject(err.to_string())
            }
        }
    }

    /// Handles one decoded message and returns the reply, if any.
    pub fn handle(&self, message: Inbound) -> Option<Outbound> {
        match message {
            Inbound::Fetch { side, search, page } => Some(self.handle_fetch(side, search, page)),
            Inbound::CheckPrefix {
                side,
                search,
                count,
                digest,
            } => {
                let store = self.context.queue.read();
                let check = self
                    .context
                    .reconciler
                    .check_prefix(&store, side, &search, count, &digest);
                Some(Outbound::PrefixCheckResult {
                    side,
                    search,
                    matches: check.matches,
                    total_count: check.total_count,
                    page_count: check.page_count,
                })
            }
            Inbound::CheckPage {
                side,
                search,
                page,
                digest,
            } => {
                let store = self.context.queue.read();
                self.context
                    .reconciler
                    .check_page(&store, side, &search, page, &digest)
                    .map(|items| Outbound::PageData { side, page, items })
            }
            mutation => {
                let action = mutation.to_action()?;
                self.handle_mutation(action)
            }
        }
    }

    fn handle_fetch(&self, side: Side, search: String, page: usize) -> Outbound {
        let items = {
            let store = self.context.queue.read();
            self.context.reconciler.page(&store, side, &search, page)
        };
        Outbound::Items {
            side,
            page,
            search,
            items,
        }
    }

    fn handle_mutation(&self, action: Action) -> Option<Outbound> {
        match self.context.queue.enqueue(action) {
            EnqueueOutcome::Rejected => self.reject("pending queue is full".into()),
            EnqueueOutcome::Queued | EnqueueOutcome::Collapsed | EnqueueOutcome::Replaced => None,
        }
    }

    fn reject(&self, reason: String) -> Option<Outbound> {
        self.context
            .config
            .reply_on_rejection
            .then_some(Outbound::Rejected { reason })
    }
}
