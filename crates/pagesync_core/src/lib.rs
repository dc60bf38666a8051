//! # PageSync Core
//!
//! Server-side state and synchronization primitives for PageSync.
//!
//! This crate provides:
//! - `ItemUniverse`, the growable pool of known item identifiers
//! - `SelectionState`, the ordered, deduplicated subset currently selected
//! - `MutationQueue`, a deduplicating queue applied atomically at flush time
//! - `ViewProjector`, deterministic filtered and paginated views
//! - `Reconciler`, digest-based staleness detection for cached pages
//!
//! This is a pure crate with no I/O. Timers, transport and fan-out live in
//! `pagesync_server`.
//!
//! ## Key Invariants
//!
//! - Every mutation goes through `MutationQueue::flush`
//! - Readers never observe a partially applied batch
//! - Identical committed state and identical `(side, search)` yield identical views
//! - The selection sequence and membership set always hold the same ids

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod action;
mod config;
mod digest;
mod error;
mod queue;
mod reconcile;
mod selection;
mod store;
mod types;
mod universe;
mod view;

pub use action::{Action, ActionKind, DedupeKey, QueueClass};
pub use config::{CoreConfig, ReorderPolicy};
pub use digest::{Digest, DigestAlgorithm};
pub use error::{CoreError, CoreResult};
pub use queue::{EnqueueOutcome, FlushReport, MutationQueue};
pub use reconcile::{PrefixCheck, Reconciler};
pub use selection::SelectionState;
pub use store::{ChangeSet, SharedStore, Store, StoreReadGuard};
pub use types::{ItemId, Side};
pub use universe::ItemUniverse;
pub use view::{page_count, SearchFilter, ViewProjector};
