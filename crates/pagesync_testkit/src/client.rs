//! WebSocket viewer client for end-to-end tests.

use futures_util::{SinkExt, StreamExt};
use pagesync_core::Side;
use pagesync_protocol::{decode_outbound, encode, Inbound, Outbound};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// How long `recv` waits before failing the test.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// A scripted viewer. Panics on any transport failure.
pub struct TestClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Connects to a server listening on `addr`.
    pub async fn connect(addr: SocketAddr) -> Self {
        let url = format!("ws://{addr}");
        let (socket, _) = connect_async(url.as_str())
            .await
            .expect("Failed to connect viewer");
        Self { socket }
    }

    /// Sends one message.
    pub async fn send(&mut self, message: &Inbound) {
        let text = encode(message).expect("Failed to encode message");
        self.send_text(text).await;
    }

    /// Sends one message, returning false instead of panicking if the
    /// connection is gone.
    pub async fn try_send(&mut self, message: &Inbound) -> bool {
        let text = encode(message).expect("Failed to encode message");
        self.socket.send(Message::Text(text)).await.is_ok()
    }

    /// Sends a raw text frame.
    pub async fn send_text(&mut self, text: impl Into<String>) {
        self.socket
            .send(Message::Text(text.into()))
            .await
            .expect("Failed to send frame");
    }

    /// Receives the next message, failing after `RECV_TIMEOUT`.
    pub async fn recv(&mut self) -> Outbound {
        self.try_recv(RECV_TIMEOUT)
            .await
            .expect("Timed out waiting for a message")
    }

    /// Receives the next message, or `None` if nothing arrives within `wait`.
    pub async fn try_recv(&mut self, wait: Duration) -> Option<Outbound> {
        loop {
            let frame = tokio::time::timeout(wait, self.socket.next()).await.ok()?;
            match frame.expect("Connection closed").expect("Failed to read frame") {
                Message::Text(text) => {
                    return Some(decode_outbound(&text).expect("Failed to decode message"))
                }
                Message::Close(_) => panic!("Server closed the connection"),
                _ => continue,
            }
        }
    }

    /// Receives messages until one satisfies `predicate`, discarding the rest.
    pub async fn recv_matching(&mut self, predicate: impl Fn(&Outbound) -> bool) -> Outbound {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        loop {
            let left = deadline.saturating_duration_since(tokio::time::Instant::now());
            let message = self
                .try_recv(left)
                .await
                .expect("Timed out waiting for a matching message");
            if predicate(&message) {
                return message;
            }
        }
    }

    /// Sends `message` and waits for the reply.
    pub async fn request(&mut self, message: &Inbound) -> Outbound {
        self.send(message).await;
        self.recv().await
    }

    /// Sends a raw text frame and waits for the reply.
    pub async fn request_text(&mut self, text: impl Into<String>) -> Outbound {
        self.send_text(text).await;
        self.recv().await
    }

    /// Asserts that nothing arrives within `wait`.
    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Some(message) = self.try_recv(wait).await {
            panic!("Expected no message, got {message:?}");
        }
    }

    /// Waits for the server to close the connection, skipping any messages
    /// still in flight. Returns false if it stays open for `wait`.
    pub async fn wait_closed(&mut self, wait: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let frame = match tokio::time::timeout_at(deadline, self.socket.next()).await {
                Ok(frame) => frame,
                Err(_) => return false,
            };
            match frame {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return true,
                Some(Ok(_)) => continue,
            }
        }
    }

    /// Closes the connection.
    pub async fn close(mut self) {
        let _ = self.socket.close(None).await;
    }
}

/// Returns true for `LIST_UPDATED` on `side`.
pub fn is_list_changed(message: &Outbound, side: Side) -> bool {
    matches!(message, Outbound::ListChanged { side: changed } if *changed == side)
}
