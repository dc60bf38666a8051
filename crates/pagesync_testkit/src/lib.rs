//! # PageSync Testkit
//!
//! Test utilities for PageSync.
//!
//! This crate provides:
//! - Store and queue fixtures with a seeded universe
//! - Property-based test generators using proptest
//! - A WebSocket viewer client for end-to-end tests
//! - Stress helpers for concurrent enqueue and flush
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagesync_testkit::prelude::*;
//!
//! #[tokio::test]
//! async fn test_with_viewer() {
//!     let mut viewer = TestClient::connect(addr).await;
//!     viewer.send(&Inbound::Select { id: 3 }).await;
//!     viewer.recv_matching(|m| matches!(m, Outbound::ListChanged { .. })).await;
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
    pub use pagesync_core::{Action, ItemId, QueueClass, Side};
    pub use pagesync_protocol::{Inbound, Outbound};
}

pub use client::*;
pub use fixtures::*;
pub use generators::*;
pub use stress::*;
