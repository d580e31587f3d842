//! SessionClient - the main interface for copad.
//!
//! This module provides [`SessionClient`], the I/O shell that keeps one
//! client's view of a shared session converging with its peers.
//!
//! # Architecture
//!
//! ```text
//! Application → SessionClient → Transport → Network
//!                    ↓
//!               copad-core (pure state machine)
//! ```
//!
//! The state machine decides which broadcasts an operation produces;
//! the client sends them and filters inbound traffic. Malformed frames
//! and frames for a foreign session are discarded silently (the channel
//! may multiplex several sessions), everything else is applied with
//! last-write-wins semantics.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use copad_core::SessionState;
use copad_types::{ClientEvent, Language, ProtocolError, ServerEvent, SessionId};

use crate::transport::{Transport, TransportError};

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Protocol encoding error.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// No session has been joined.
    #[error("no active session")]
    NotJoined,

    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

/// The client side of one collaborative session.
///
/// Owns exactly one channel and one session's state. Joining another
/// session tears the previous channel down first, so handlers for a
/// dead session can never mutate live state.
pub struct SessionClient<T: Transport> {
    transport: T,
    state: Arc<Mutex<Option<SessionState>>>,
}

impl<T: Transport> SessionClient<T> {
    /// Create a new client over the given transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: Arc::new(Mutex::new(None)),
        }
    }

    /// Connect to the channel endpoint and join a session.
    ///
    /// Any previously joined session is disconnected first. The new
    /// session starts in the loading state until the backend answers the
    /// join announcement with a `code_update`; there is no other join
    /// acknowledgement.
    pub async fn connect(&self, url: &str, session_id: SessionId) -> Result<(), ClientError> {
        if self.transport.is_connected() {
            debug!(session = %session_id, "tearing down previous channel before rejoin");
            self.transport.close().await?;
        }

        self.transport
            .connect(url)
            .await
            .map_err(|e| ClientError::ConnectionFailed(e.to_string()))?;

        let join = ClientEvent::JoinSession {
            session_id: session_id.clone(),
        };
        self.transport.send(&join.to_bytes()?).await?;

        *self.state.lock().await = Some(SessionState::new(session_id));
        Ok(())
    }

    /// Apply a local edit (full-text replace).
    ///
    /// Returns `true` if the edit was broadcast, `false` if the
    /// echo-suppression guard swallowed it.
    pub async fn edit(&self, new_code: &str) -> Result<bool, ClientError> {
        let event = {
            let mut guard = self.state.lock().await;
            let state = guard.as_mut().ok_or(ClientError::NotJoined)?;
            state.local_edit(new_code)
        };

        match event {
            Some(event) => {
                self.transport.send(&event.to_bytes()?).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Apply a local language selection.
    ///
    /// Broadcasts the language change, and additionally a code change if
    /// the template policy rewrote the document.
    pub async fn set_language(&self, language: Language) -> Result<(), ClientError> {
        let events = {
            let mut guard = self.state.lock().await;
            let state = guard.as_mut().ok_or(ClientError::NotJoined)?;
            state.local_language_change(language)
        };

        for event in events {
            self.transport.send(&event.to_bytes()?).await?;
        }
        Ok(())
    }

    /// Receive and apply one inbound frame.
    ///
    /// Returns the applied event, or `None` if the frame was discarded
    /// (malformed, or addressed to a foreign session). Returns an error
    /// when the channel closes or no session is joined.
    pub async fn process_incoming(&self) -> Result<Option<ServerEvent>, ClientError> {
        let frame = self.transport.recv().await?;

        let event = match ServerEvent::from_bytes(&frame) {
            Ok(event) => event,
            Err(e) => {
                debug!(error = %e, "discarding malformed frame");
                return Ok(None);
            }
        };

        let mut guard = self.state.lock().await;
        let state = guard.as_mut().ok_or(ClientError::NotJoined)?;
        if state.apply_remote(&event) {
            Ok(Some(event))
        } else {
            debug!(session = %event.session_id(), "discarding frame for foreign session");
            Ok(None)
        }
    }

    /// Disconnect from the session and close the channel.
    ///
    /// No inbound events are processed after this call.
    pub async fn disconnect(&self) -> Result<(), ClientError> {
        self.transport.close().await?;
        *self.state.lock().await = None;
        Ok(())
    }

    /// Whether the channel is currently open.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// The joined session's id, if any.
    pub async fn session_id(&self) -> Option<SessionId> {
        self.state.lock().await.as_ref().map(|s| s.session_id().clone())
    }

    /// The current document text, if a session is joined.
    pub async fn code(&self) -> Option<String> {
        self.state.lock().await.as_ref().map(|s| s.code().to_string())
    }

    /// The current language, if a session is joined.
    pub async fn language(&self) -> Option<Language> {
        self.state.lock().await.as_ref().map(|s| s.language())
    }

    /// The last recorded execution output, if a session is joined.
    pub async fn output(&self) -> Option<String> {
        self.state.lock().await.as_ref().map(|s| s.output().to_string())
    }

    /// Whether the initial `code_update` is still outstanding.
    pub async fn is_loading(&self) -> bool {
        self.state
            .lock()
            .await
            .as_ref()
            .map(|s| s.is_loading())
            .unwrap_or(false)
    }

    /// Record execution output for display. Output is local-only and
    /// never broadcast.
    pub async fn set_output(&self, output: impl Into<String>) -> Result<(), ClientError> {
        let mut guard = self.state.lock().await;
        let state = guard.as_mut().ok_or(ClientError::NotJoined)?;
        state.set_output(output);
        Ok(())
    }

    /// Get a reference to the underlying transport (for testing).
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    async fn connected_client() -> (SessionClient<MockTransport>, MockTransport) {
        let transport = MockTransport::new();
        let client = SessionClient::new(transport.clone());
        client
            .connect("ws://localhost:8000/ws", SessionId::new("s1"))
            .await
            .unwrap();
        (client, transport)
    }

    fn initial_code_update(session: &str) -> ServerEvent {
        ServerEvent::CodeUpdate {
            session_id: SessionId::new(session),
            code: Language::Javascript.template().into(),
            language: Language::Javascript,
        }
    }

    // ===========================================
    // Connection Tests
    // ===========================================

    #[tokio::test]
    async fn connect_sends_join_announcement() {
        let (client, transport) = connected_client().await;

        assert!(client.is_connected());
        assert_eq!(
            transport.connected_url(),
            Some("ws://localhost:8000/ws".to_string())
        );
        assert_eq!(
            transport.sent_client_events(),
            vec![ClientEvent::JoinSession {
                session_id: SessionId::new("s1"),
            }]
        );
        assert!(client.is_loading().await);
    }

    #[tokio::test]
    async fn reconnect_tears_down_previous_channel() {
        let (client, transport) = connected_client().await;

        client
            .connect("ws://localhost:8000/ws", SessionId::new("s2"))
            .await
            .unwrap();

        // No dual-subscription: the old channel was closed first.
        assert_eq!(transport.close_count(), 1);
        assert_eq!(client.session_id().await, Some(SessionId::new("s2")));
        assert!(client.is_loading().await);

        let events = transport.sent_client_events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            ClientEvent::JoinSession {
                session_id: SessionId::new("s2"),
            }
        );
    }

    #[tokio::test]
    async fn connect_failure_surfaces_as_error() {
        let transport = MockTransport::new();
        transport.fail_next_connect("refused");
        let client = SessionClient::new(transport);

        let result = client.connect("ws://test", SessionId::new("s1")).await;

        assert!(matches!(result, Err(ClientError::ConnectionFailed(_))));
        assert_eq!(client.session_id().await, None);
    }

    // ===========================================
    // Local Edit Tests
    // ===========================================

    #[tokio::test]
    async fn edit_broadcasts_code_change() {
        let (client, transport) = connected_client().await;

        assert!(client.edit("let x = 1;").await.unwrap());

        assert_eq!(client.code().await.as_deref(), Some("let x = 1;"));
        assert_eq!(
            transport.sent_client_events().last().unwrap(),
            &ClientEvent::CodeChange {
                session_id: SessionId::new("s1"),
                code: "let x = 1;".into(),
            }
        );
    }

    #[tokio::test]
    async fn identical_edit_is_not_rebroadcast() {
        let (client, transport) = connected_client().await;

        assert!(client.edit("same").await.unwrap());
        assert!(!client.edit("same").await.unwrap());

        // join + one code_change only
        assert_eq!(transport.sent_client_events().len(), 2);
    }

    #[tokio::test]
    async fn edit_without_session_fails() {
        let client = SessionClient::new(MockTransport::new());
        assert!(matches!(
            client.edit("x").await,
            Err(ClientError::NotJoined)
        ));
    }

    // ===========================================
    // Language Switch Tests
    // ===========================================

    #[tokio::test]
    async fn language_switch_on_template_broadcasts_pair() {
        let (client, transport) = connected_client().await;
        client
            .process_incoming_prepared(&transport, initial_code_update("s1"))
            .await;

        client.set_language(Language::Python).await.unwrap();

        let events = transport.sent_client_events();
        // join, language_change, code_change - in that order
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[1],
            ClientEvent::LanguageChange {
                session_id: SessionId::new("s1"),
                language: Language::Python,
            }
        );
        assert_eq!(
            events[2],
            ClientEvent::CodeChange {
                session_id: SessionId::new("s1"),
                code: "# Write your code here\n".into(),
            }
        );
        assert_eq!(client.output().await.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn language_switch_preserves_user_code() {
        let (client, transport) = connected_client().await;
        client
            .process_incoming_prepared(&transport, initial_code_update("s1"))
            .await;
        client.edit("print(1)").await.unwrap();

        client.set_language(Language::Go).await.unwrap();

        assert_eq!(client.code().await.as_deref(), Some("print(1)"));
        let events = transport.sent_client_events();
        assert!(matches!(
            events.last().unwrap(),
            ClientEvent::LanguageChange {
                language: Language::Go,
                ..
            }
        ));
    }

    // ===========================================
    // Inbound Event Tests
    // ===========================================

    #[tokio::test]
    async fn code_update_ends_loading_and_applies() {
        let (client, transport) = connected_client().await;
        transport.queue_server_event(&ServerEvent::CodeUpdate {
            session_id: SessionId::new("s1"),
            code: "x = 1".into(),
            language: Language::Python,
        });

        let event = client.process_incoming().await.unwrap();

        assert!(event.is_some());
        assert!(!client.is_loading().await);
        assert_eq!(client.code().await.as_deref(), Some("x = 1"));
        assert_eq!(client.language().await, Some(Language::Python));
    }

    #[tokio::test]
    async fn foreign_session_frame_is_discarded() {
        let (client, transport) = connected_client().await;
        transport.queue_server_event(&ServerEvent::CodeUpdate {
            session_id: SessionId::new("abc"),
            code: "x=1".into(),
            language: Language::Python,
        });

        let event = client.process_incoming().await.unwrap();

        assert!(event.is_none());
        assert_eq!(client.code().await.as_deref(), Some(""));
        assert!(client.is_loading().await);
    }

    #[tokio::test]
    async fn malformed_frame_is_discarded() {
        let (client, transport) = connected_client().await;
        transport.queue_frame(b"not json at all".to_vec());

        let event = client.process_incoming().await.unwrap();

        assert!(event.is_none());
    }

    #[tokio::test]
    async fn language_update_clears_output_keeps_code() {
        let (client, transport) = connected_client().await;
        client
            .process_incoming_prepared(&transport, initial_code_update("s1"))
            .await;
        client.edit("work in progress").await.unwrap();
        client.set_output("old output").await.unwrap();

        transport.queue_server_event(&ServerEvent::LanguageUpdate {
            session_id: SessionId::new("s1"),
            language: Language::Java,
        });
        client.process_incoming().await.unwrap();

        assert_eq!(client.code().await.as_deref(), Some("work in progress"));
        assert_eq!(client.language().await, Some(Language::Java));
        assert_eq!(client.output().await.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn closed_channel_surfaces_as_transport_error() {
        let (client, _transport) = connected_client().await;

        // Empty queue models a closed channel in the mock.
        let result = client.process_incoming().await;

        assert!(matches!(
            result,
            Err(ClientError::Transport(TransportError::ConnectionClosed))
        ));
    }

    // ===========================================
    // Disconnect Tests
    // ===========================================

    #[tokio::test]
    async fn disconnect_drops_session() {
        let (client, transport) = connected_client().await;

        client.disconnect().await.unwrap();

        assert!(!client.is_connected());
        assert_eq!(client.session_id().await, None);
        assert!(matches!(
            client.edit("x").await,
            Err(ClientError::NotJoined)
        ));

        // No inbound processing after disconnect.
        transport.queue_server_event(&initial_code_update("s1"));
        assert!(client.process_incoming().await.is_err());
    }

    // ===========================================
    // Helpers
    // ===========================================

    impl SessionClient<MockTransport> {
        /// Queue an event on the mock and apply it, panicking if it was
        /// not applied. Test-only plumbing.
        async fn process_incoming_prepared(
            &self,
            transport: &MockTransport,
            event: ServerEvent,
        ) {
            transport.queue_server_event(&event);
            assert!(self.process_incoming().await.unwrap().is_some());
        }
    }
}
