//! Serve command implementation.

use clap::Args;
use pagesync_core::{CoreConfig, DigestAlgorithm, ReorderPolicy};
use pagesync_server::{ServerConfig, SyncServer};
use std::net::SocketAddr;
use std::time::Duration;

/// Options of `pagesync serve`. Every flag can also come from the environment.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "PAGESYNC_BIND", default_value = "127.0.0.1:3001")]
    pub bind: SocketAddr,

    /// Items per page
    #[arg(long, env = "PAGESYNC_PAGE_SIZE", default_value_t = 20)]
    pub page_size: usize,

    /// Flush period of select, deselect and reorder, in milliseconds
    #[arg(long, env = "PAGESYNC_FAST_INTERVAL_MS", default_value_t = 1_000)]
    pub fast_interval_ms: u64,

    /// Flush period of add, in milliseconds
    #[arg(long, env = "PAGESYNC_SLOW_INTERVAL_MS", default_value_t = 10_000)]
    pub slow_interval_ms: u64,

    /// The universe starts as 1..=N
    #[arg(long, env = "PAGESYNC_SEED_ITEMS", default_value_t = 1_000_000)]
    pub seed_items: u64,

    /// Maximum concurrent viewers
    #[arg(long, env = "PAGESYNC_MAX_CONNECTIONS", default_value_t = 1_000)]
    pub max_connections: usize,

    /// Cap on pending actions per queue (unbounded if unset)
    #[arg(long, env = "PAGESYNC_MAX_PENDING")]
    pub max_pending: Option<usize>,

    /// What a reorder does with selected ids it omits (append, truncate)
    #[arg(long, env = "PAGESYNC_REORDER_POLICY", default_value = "append")]
    pub reorder_policy: ReorderPolicy,

    /// Digest algorithm shared with viewers (sha1, sha256)
    #[arg(long, env = "PAGESYNC_DIGEST", default_value = "sha1")]
    pub digest: DigestAlgorithm,

    /// Answer malformed or refused requests with REJECTED
    #[arg(long, env = "PAGESYNC_REPLY_ON_REJECTION")]
    pub reply_on_rejection: bool,
}

impl ServeArgs {
    /// Builds the server configuration.
    pub fn to_config(&self) -> ServerConfig {
        let mut core = CoreConfig::new()
            .with_page_size(self.page_size)
            .with_digest_algorithm(self.digest)
            .with_reorder_policy(self.reorder_policy);
        if let Some(max) = self.max_pending {
            core = core.with_max_pending(max);
        }

        let config = ServerConfig::new(self.bind)
            .with_core(core)
            .with_intervals(
                Duration::from_millis(self.fast_interval_ms),
                Duration::from_millis(self.slow_interval_ms),
            )
            .with_seed_items(self.seed_items)
            .with_max_connections(self.max_connections);

        if self.reply_on_rejection {
            config.with_rejection_replies()
        } else {
            config
        }
    }
}

/// Runs the server until ctrl-c.
pub async fn run(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.to_config();
    tracing::info!(
        bind = %config.bind_addr,
        seed_items = config.seed_items,
        page_size = config.core.page_size,
        digest = config.core.digest_algorithm.as_str(),
        "starting pagesync server"
    );

    let server = SyncServer::new(config)?;
    server.run().await?;
    Ok(())
}
