//! # PageSync Server
//!
//! WebSocket server that keeps many viewers' paginated caches consistent
//! with one authoritative selection.
//!
//! This crate provides:
//! - Per-viewer WebSocket connections with FIFO replies
//! - Two flush timers (interactive changes, universe additions)
//! - Content-free change notifications after each effective flush
//! - Prefix and page digest checks for cache repair
//!
//! # Architecture
//!
//! ```text
//! viewer -> enqueue (deduped) -> timer tick -> flush (atomic)
//!        <- LIST_UPDATED      <- broadcaster <-+
//! viewer -> CHECK_HASH / CHECK_PAGE -> reconciler -> stale pages only
//! ```
//!
//! The server keeps no per-viewer state besides the connection registry.
//! A viewer that reconnects issues a fresh prefix check.
//!
//! # Example
//!
//! ```rust,ignore
//! use pagesync_server::{ServerConfig, SyncServer};
//!
//! let server = SyncServer::new(ServerConfig::default())?;
//! server.run().await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod broadcaster;
mod config;
mod connection;
mod error;
mod handler;
mod scheduler;
mod server;

pub use broadcaster::{Broadcaster, ConnectionId};
pub use config::{ServerConfig, MAX_SEED_ITEMS};
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerContext, RequestHandler};
pub use scheduler::{Scheduler, SchedulerHandle};
pub use server::SyncServer;
