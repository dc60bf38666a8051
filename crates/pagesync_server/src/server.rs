//! Main sync server.

use crate::broadcaster::Broadcaster;
use crate::config::ServerConfig;
use crate::connection::Connection;
use crate::error::ServerResult;
use crate::handler::{HandlerContext, RequestHandler};
use crate::scheduler::Scheduler;
use pagesync_core::{ItemUniverse, MutationQueue, Store};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;

/// The sync server.
///
/// Owns the authoritative store (through the mutation queue), the flush
/// timers and the connection registry.
///
/// # Example
///
/// ```
/// use pagesync_server::{ServerConfig, SyncServer};
///
/// let config = ServerConfig::default().with_seed_items(100);
/// let server = SyncServer::new(config).unwrap();
/// assert_eq!(server.queue().read().universe().len(), 100);
/// ```
pub struct SyncServer {
    context: Arc<HandlerContext>,
    broadcaster: Arc<Broadcaster>,
    scheduler: Arc<Scheduler>,
    connections: Arc<Semaphore>,
}

impl SyncServer {
    /// Creates a server whose universe is `1..=config.seed_items`.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let universe = ItemUniverse::with_range(config.seed_items);
        Self::with_store(config, Store::new(universe))
    }

    /// Creates a server over an existing store.
    pub fn with_store(config: ServerConfig, store: Store) -> ServerResult<Self> {
        config.validate()?;
        let queue = Arc::new(MutationQueue::new(store, config.core.clone()));
        let broadcaster = Arc::new(Broadcaster::new());
        let scheduler = Arc::new(Scheduler::new(
            Arc::clone(&queue),
            Arc::clone(&broadcaster),
            config.fast_interval,
            config.slow_interval,
        ));
        let connections = Arc::new(Semaphore::new(config.max_connections));
        let context = Arc::new(HandlerContext::new(config, queue));

        Ok(Self {
            context,
            broadcaster,
            scheduler,
            connections,
        })
    }

    /// Returns a handler bound to this server's state.
    pub fn handler(&self) -> RequestHandler {
        RequestHandler::new(Arc::clone(&self.context))
    }

    /// Returns the mutation queue.
    pub fn queue(&self) -> &Arc<MutationQueue> {
        &self.context.queue
    }

    /// Returns the flush scheduler.
    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    /// Returns the connection registry.
    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.broadcaster
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.context.config
    }

    /// Binds the configured address.
    pub async fn bind(&self) -> ServerResult<TcpListener> {
        Ok(TcpListener::bind(self.context.config.bind_addr).await?)
    }

    /// Serves `listener` until `shutdown` resolves.
    ///
    /// The flush timers run for exactly as long as this call. On shutdown
    /// every open viewer is sent a Close frame and unregistered before the
    /// timers stop, so no mutation is accepted that will never be flushed.
    pub async fn serve_with_shutdown<F>(&self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()>,
    {
        let local = listener.local_addr()?;
        let timers = Arc::clone(&self.scheduler).start();
        let (closing, closing_rx) = watch::channel(false);
        let mut viewers = JoinSet::new();
        tracing::info!(addr = %local, "pagesync server listening");

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => self.accept(&mut viewers, &closing_rx, stream, peer),
                    Err(err) => tracing::warn!(error = %err, "accept failed"),
                },
                Some(_) = viewers.join_next(), if !viewers.is_empty() => {}
            }
        }

        drop(listener);
        let _ = closing.send(true);
        let open = viewers.len();
        while let Some(joined) = viewers.join_next().await {
            if let Err(err) = joined {
                tracing::warn!(error = %err, "connection task failed");
            }
        }
        tracing::debug!(closed = open, "viewers closed");

        timers.stop().await;
        tracing::info!(addr = %local, "pagesync server stopped");
        Ok(())
    }

    /// Binds and serves until ctrl-c.
    pub async fn run(&self) -> ServerResult<()> {
        let listener = self.bind().await?;
        self.serve_with_shutdown(listener, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "failed to listen for ctrl-c");
            }
        })
        .await
    }

    fn accept(
        &self,
        viewers: &mut JoinSet<()>,
        closing: &watch::Receiver<bool>,
        stream: TcpStream,
        peer: SocketAddr,
    ) {
        let permit = match Arc::clone(&self.connections).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                tracing::warn!(%peer, "connection limit reached, refusing viewer");
                return;
            }
        };

        let connection = Connection {
            handler: self.handler(),
            broadcaster: Arc::clone(&self.broadcaster),
            outbound_buffer: self.context.config.outbound_buffer,
            handshake_timeout: self.context.config.handshake_timeout,
            shutdown: closing.clone(),
        };
        viewers.spawn(async move {
            if let Err(err) = connection.serve(stream, peer, permit).await {
                if !err.is_connection_error() {
                    tracing::warn!(%peer, error = %err, "connection failed");
                }
            }
        });
    }
}
