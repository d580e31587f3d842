//! Transport abstraction for the copad duplex channel.
//!
//! This module provides a pluggable transport layer that abstracts the
//! underlying connection mechanism (WebSocket, mock for testing).
//!
//! # Design
//!
//! The transport trait is async and connection-oriented:
//! - `connect()` establishes a connection
//! - `send()` transmits one JSON event frame
//! - `recv()` receives one frame
//! - `close()` terminates; connecting again first closes any previous
//!   connection, so a client never holds two subscriptions
//!
//! Connect failures are not retried at this layer; the caller decides
//! whether to rejoin.

mod mock;
mod ws;

pub use mock::MockTransport;
pub use ws::{WsTransport, WsTransportConfig};

use async_trait::async_trait;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Not connected.
    #[error("not connected")]
    NotConnected,

    /// Connection closed.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// Connection timeout.
    #[error("connection timeout")]
    Timeout,
}

/// Transport trait for the session event channel.
///
/// Frames are JSON-encoded protocol events, one event per frame. The
/// channel may multiplex several sessions; filtering is the receiver's
/// job, not the transport's.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to the channel endpoint at the given URL.
    ///
    /// Tears down any existing connection first.
    async fn connect(&self, url: &str) -> Result<(), TransportError>;

    /// Send one event frame.
    async fn send(&self, frame: &[u8]) -> Result<(), TransportError>;

    /// Receive one event frame.
    ///
    /// Blocks until a frame is available or the connection closes.
    async fn recv(&self) -> Result<Vec<u8>, TransportError>;

    /// Check if currently connected.
    fn is_connected(&self) -> bool;

    /// Close the connection.
    async fn close(&self) -> Result<(), TransportError>;
}
