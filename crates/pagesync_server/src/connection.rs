//! One viewer connection.

use crate::broadcaster::{Broadcaster, ConnectionId};
use crate::error::{ServerError, ServerResult};
use crate::handler::RequestHandler;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use pagesync_protocol::{encode, Outbound};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch, OwnedSemaphorePermit};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Everything a connection task needs from the server.
#[derive(Clone)]
pub(crate) struct Connection {
    pub(crate) handler: RequestHandler,
    pub(crate) broadcaster: Arc<Broadcaster>,
    pub(crate) outbound_buffer: usize,
    pub(crate) handshake_timeout: Duration,
    /// Flips to `true` when the server shuts down.
    pub(crate) shutdown: watch::Receiver<bool>,
}

impl Connection {
    /// Serves one accepted TCP stream until the viewer goes away or the
    /// server shuts down.
    ///
    /// Replies and change notifications share one bounded outbound queue, so
    /// a viewer sees them in the order they were produced. The permit is
    /// held for the whole lifetime, handshake included.
    pub(crate) async fn serve(
        mut self,
        stream: TcpStream,
        peer: SocketAddr,
        _permit: OwnedSemaphorePermit,
    ) -> ServerResult<()> {
        let handshake = tokio::time::timeout(self.handshake_timeout, accept_async(stream));
        let socket = tokio::select! {
            accepted = handshake => match accepted {
                Ok(socket) => socket?,
                Err(_) => {
                    tracing::debug!(%peer, "handshake timed out");
                    return Err(ServerError::HandshakeTimeout);
                }
            },
            _ = self.shutdown.changed() => return Ok(()),
        };
        let (sink, mut source) = socket.split();

        let (tx, rx) = mpsc::channel(self.outbound_buffer);
        let id = self.broadcaster.register(tx.clone());
        tracing::info!(connection = id, %peer, "viewer connected");

        let writer = tokio::spawn(write_outbound(id, sink, rx));

        let mut result = Ok(());
        loop {
            let frame = tokio::select! {
                frame = source.next() => frame,
                _ = self.shutdown.changed() => {
                    tracing::debug!(connection = id, "closing viewer for shutdown");
                    break;
                }
            };
            let Some(frame) = frame else { break };

            let text = match frame {
                Ok(Message::Text(text)) => text,
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => text,
                    Err(_) => {
                        tracing::debug!(connection = id, "dropping non-utf8 binary frame");
                        continue;
                    }
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(err) => {
                    result = Err(err.into());
                    break;
                }
            };

            if let Some(reply) = self.handler.handle_text(&text) {
                if tx.send(reply).await.is_err() {
                    break;
                }
            }
        }

        // The writer sends what is queued, then a Close frame.
        self.broadcaster.unregister(id);
        drop(tx);
        if let Err(err) = writer.await {
            tracing::warn!(connection = id, error = %err, "writer task failed");
        }

        match &result {
            Ok(()) => tracing::info!(connection = id, %peer, "viewer disconnected"),
            Err(err) => tracing::debug!(connection = id, %peer, error = %err, "viewer dropped"),
        }
        result
    }
}

async fn write_outbound(id: ConnectionId, mut sink: WsSink, mut rx: mpsc::Receiver<Outbound>) {
    while let Some(message) = rx.recv().await {
        let text = match encode(&message) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(connection = id, error = %err, "failed to encode message");
                continue;
            }
        };
        if let Err(err) = sink.send(Message::Text(text)).await {
            tracing::debug!(connection = id, error = %err, "write failed");
            break;
        }
    }
    let _ = sink.close().await;
}
