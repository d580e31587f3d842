//! WsTransport - real duplex channel over WebSocket.
//!
//! Connects to the backend's realtime endpoint and carries protocol
//! events as JSON text frames, one event per frame.

use super::{Transport, TransportError};
use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Configuration for WsTransport.
#[derive(Clone, Debug)]
pub struct WsTransportConfig {
    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Default for WsTransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Split halves of an established WebSocket connection.
struct ActiveConnection {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
}

/// WebSocket implementation of the [`Transport`] trait.
///
/// Failed connects are not retried here; recovery is rejoin-by-reconnect
/// at the caller's discretion.
pub struct WsTransport {
    connection: Arc<Mutex<Option<ActiveConnection>>>,
    config: WsTransportConfig,
}

impl WsTransport {
    /// Create a new, unconnected WsTransport.
    pub fn new() -> Self {
        Self::with_config(WsTransportConfig::default())
    }

    /// Create a WsTransport with custom configuration.
    pub fn with_config(config: WsTransportConfig) -> Self {
        Self {
            connection: Arc::new(Mutex::new(None)),
            config,
        }
    }
}

impl Default for WsTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn connect(&self, url: &str) -> Result<(), TransportError> {
        // One channel per client: drop any previous connection first.
        self.close().await.ok();

        let (stream, _response) =
            tokio::time::timeout(self.config.connect_timeout, connect_async(url))
                .await
                .map_err(|_| TransportError::Timeout)?
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        let (sink, stream) = stream.split();
        *self.connection.lock().await = Some(ActiveConnection { sink, stream });
        Ok(())
    }

    async fn send(&self, frame: &[u8]) -> Result<(), TransportError> {
        let text = String::from_utf8(frame.to_vec())
            .map_err(|e| TransportError::SendFailed(format!("frame is not UTF-8: {e}")))?;

        let mut guard = self.connection.lock().await;
        let conn = guard.as_mut().ok_or(TransportError::NotConnected)?;

        conn.sink
            .send(Message::Text(text))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn recv(&self) -> Result<Vec<u8>, TransportError> {
        let mut guard = self.connection.lock().await;
        let conn = guard.as_mut().ok_or(TransportError::NotConnected)?;

        loop {
            match conn.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text.into_bytes()),
                Some(Ok(Message::Binary(bytes))) => return Ok(bytes),
                // Control frames are not protocol events.
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                Some(Ok(Message::Close(_))) | None => {
                    *guard = None;
                    return Err(TransportError::ConnectionClosed);
                }
                Some(Err(e)) => {
                    *guard = None;
                    return Err(TransportError::ReceiveFailed(e.to_string()));
                }
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connection
            .try_lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    async fn close(&self) -> Result<(), TransportError> {
        if let Some(mut conn) = self.connection.lock().await.take() {
            // Best effort; the peer may already be gone.
            conn.sink.send(Message::Close(None)).await.ok();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        let transport = WsTransport::new();
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn send_without_connect_fails() {
        let transport = WsTransport::new();
        assert!(matches!(
            transport.send(b"{}").await,
            Err(TransportError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn recv_without_connect_fails() {
        let transport = WsTransport::new();
        assert!(matches!(
            transport.recv().await,
            Err(TransportError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn connect_to_unreachable_endpoint_fails() {
        let config = WsTransportConfig {
            connect_timeout: Duration::from_millis(200),
        };
        let transport = WsTransport::with_config(config);

        // Nothing listens on this port.
        let result = transport.connect("ws://127.0.0.1:1/ws").await;

        assert!(matches!(
            result,
            Err(TransportError::ConnectionFailed(_) | TransportError::Timeout)
        ));
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let transport = WsTransport::new();
        transport.close().await.unwrap();
        transport.close().await.unwrap();
    }
}
