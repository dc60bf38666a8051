//! Server configuration.

use crate::error::{ServerError, ServerResult};
use pagesync_core::CoreConfig;
use std::net::SocketAddr;
use std::time::Duration;

/// Largest universe the server will seed at startup.
pub const MAX_SEED_ITEMS: u64 = 100_000_000;

/// Configuration for the sync server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Page size, digest algorithm, reorder policy and queue cap.
    pub core: CoreConfig,
    /// Flush period for select, deselect and reorder.
    pub fast_interval: Duration,
    /// Flush period for add.
    pub slow_interval: Duration,
    /// The universe starts as `1..=seed_items`.
    pub seed_items: u64,
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// Deadline for the WebSocket upgrade of a new connection.
    pub handshake_timeout: Duration,
    /// Per-connection outbound queue depth.
    pub outbound_buffer: usize,
    /// Reply `REJECTED` to malformed messages and refused actions instead
    /// of dropping them silently.
    pub reply_on_rejection: bool,
}

impl ServerConfig {
    /// Creates a new server configuration.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            core: CoreConfig::default(),
            fast_interval: Duration::from_secs(1),
            slow_interval: Duration::from_secs(10),
            seed_items: 1_000_000,
            max_connections: 1000,
            handshake_timeout: Duration::from_secs(10),
            outbound_buffer: 256,
            reply_on_rejection: false,
        }
    }

    /// Sets the core configuration.
    pub fn with_core(mut self, core: CoreConfig) -> Self {
        self.core = core;
        self
    }

    /// Sets both flush periods.
    pub fn with_intervals(mut self, fast: Duration, slow: Duration) -> Self {
        self.fast_interval = fast;
        self.slow_interval = slow;
        self
    }

    /// Sets the size of the seeded universe.
    pub fn with_seed_items(mut self, count: u64) -> Self {
        self.seed_items = count;
        self
    }

    /// Sets the maximum concurrent connections.
    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the WebSocket handshake deadline.
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Sets the per-connection outbound queue depth.
    pub fn with_outbound_buffer(mut self, depth: usize) -> Self {
        self.outbound_buffer = depth;
        self
    }

    /// Enables `REJECTED` replies.
    pub fn with_rejection_replies(mut self) -> Self {
        self.reply_on_rejection = true;
        self
    }

    /// Checks that all values are usable.
    pub fn validate(&self) -> ServerResult<()> {
        self.core.validate()?;
        if self.fast_interval.is_zero() || self.slow_interval.is_zero() {
            return Err(ServerError::InvalidConfig(
                "flush intervals must be non-zero".into(),
            ));
        }
        if self.handshake_timeout.is_zero() {
            return Err(ServerError::InvalidConfig(
                "handshake_timeout must be non-zero".into(),
            ));
        }
        if self.seed_items > MAX_SEED_ITEMS {
            return Err(ServerError::InvalidConfig(format!(
                "seed_items must be at most {MAX_SEED_ITEMS}"
            )));
        }
        if self.max_connections == 0 {
            return Err(ServerError::InvalidConfig(
                "max_connections must be greater than zero".into(),
            ));
        }
        if self.outbound_buffer == 0 {
            return Err(ServerError::InvalidConfig(
                "outbound_buffer must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 3001)))
    }
}
