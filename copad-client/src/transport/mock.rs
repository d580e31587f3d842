//! Mock transport for testing.
//!
//! Queues inbound frames and captures outbound frames, with typed
//! helpers so tests can assert on protocol events instead of raw bytes.

use super::{Transport, TransportError};
use async_trait::async_trait;
use copad_types::{ClientEvent, ServerEvent};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mock transport for testing.
///
/// Clones share state, so a test can keep one handle for assertions
/// while the client owns the other.
#[derive(Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    connected: bool,
    connected_url: Option<String>,
    sent_frames: Vec<Vec<u8>>,
    inbound: VecDeque<Vec<u8>>,
    fail_next_connect: Option<String>,
    fail_next_send: Option<String>,
    fail_next_recv: Option<String>,
    close_count: u32,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw frame to be returned by the next `recv()` call.
    pub fn queue_frame(&self, frame: Vec<u8>) {
        self.inner.lock().unwrap().inbound.push_back(frame);
    }

    /// Queue a server event, JSON-encoded, for the next `recv()` call.
    pub fn queue_server_event(&self, event: &ServerEvent) {
        self.queue_frame(event.to_bytes().expect("event encodes"));
    }

    /// All frames that were sent, raw.
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.inner.lock().unwrap().sent_frames.clone()
    }

    /// All frames that were sent, decoded as client events.
    ///
    /// Panics if a sent frame is not a valid client event; the client
    /// under test must never emit anything else.
    pub fn sent_client_events(&self) -> Vec<ClientEvent> {
        self.sent_frames()
            .iter()
            .map(|frame| ClientEvent::from_bytes(frame).expect("sent frame decodes"))
            .collect()
    }

    /// The URL the transport was last connected to.
    pub fn connected_url(&self) -> Option<String> {
        self.inner.lock().unwrap().connected_url.clone()
    }

    /// How many times `close()` has been called.
    pub fn close_count(&self) -> u32 {
        self.inner.lock().unwrap().close_count
    }

    /// Cause the next `connect()` to fail with the given error.
    pub fn fail_next_connect(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_connect = Some(error.to_string());
    }

    /// Cause the next `send()` to fail with the given error.
    pub fn fail_next_send(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_send = Some(error.to_string());
    }

    /// Cause the next `recv()` to fail with the given error.
    pub fn fail_next_recv(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_recv = Some(error.to_string());
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&self, url: &str) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(error) = inner.fail_next_connect.take() {
            return Err(TransportError::ConnectionFailed(error));
        }

        inner.connected = true;
        inner.connected_url = Some(url.to_string());
        Ok(())
    }

    async fn send(&self, frame: &[u8]) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();

        if !inner.connected {
            return Err(TransportError::NotConnected);
        }
        if let Some(error) = inner.fail_next_send.take() {
            return Err(TransportError::SendFailed(error));
        }

        inner.sent_frames.push(frame.to_vec());
        Ok(())
    }

    async fn recv(&self) -> Result<Vec<u8>, TransportError> {
        let mut inner = self.inner.lock().unwrap();

        if !inner.connected {
            return Err(TransportError::NotConnected);
        }
        if let Some(error) = inner.fail_next_recv.take() {
            return Err(TransportError::ReceiveFailed(error));
        }

        inner
            .inbound
            .pop_front()
            .ok_or(TransportError::ConnectionClosed)
    }

    fn is_connected(&self) -> bool {
        self.inner.lock().unwrap().connected
    }

    async fn close(&self) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.connected = false;
        inner.close_count += 1;
        Ok(())
    }
}
