//! Protocol events for the copad duplex channel.
//!
//! Events travel as JSON text frames, one event per frame, tagged by a
//! `type` field. [`ClientEvent`]s flow client → server, [`ServerEvent`]s
//! server → client. The channel may multiplex several sessions' traffic;
//! receivers filter on `session_id`.

use serde::{Deserialize, Serialize};

use crate::{Language, ProtocolError, SessionId};

/// Events sent by a client over the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Announce membership in a session after connecting.
    JoinSession {
        /// The session to join.
        session_id: SessionId,
    },
    /// Broadcast a full-text replacement of the document.
    CodeChange {
        /// The session the edit belongs to.
        session_id: SessionId,
        /// The complete new document text (not a diff).
        code: String,
    },
    /// Broadcast a language selection change.
    LanguageChange {
        /// The session the change belongs to.
        session_id: SessionId,
        /// The newly selected language.
        language: Language,
    },
}

impl ClientEvent {
    /// Serialize to a JSON text frame.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(self).map_err(ProtocolError::Encode)
    }

    /// Deserialize from a JSON text frame.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(bytes).map_err(ProtocolError::Decode)
    }

    /// The session this event targets.
    pub fn session_id(&self) -> &SessionId {
        match self {
            Self::JoinSession { session_id }
            | Self::CodeChange { session_id, .. }
            | Self::LanguageChange { session_id, .. } => session_id,
        }
    }
}

/// Events delivered to a client over the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A peer (or the join handshake) replaced the document.
    ///
    /// Carries both fields so a late joiner converges from a single event;
    /// the first one received ends the initial loading state.
    CodeUpdate {
        /// The session the update belongs to.
        session_id: SessionId,
        /// The complete document text.
        code: String,
        /// The session's current language.
        language: Language,
    },
    /// A peer changed the session language.
    ///
    /// Deliberately does not carry code: if the sender also rewrote the
    /// document, a separate `code_update` follows, which avoids the two
    /// fields racing each other out of order at the receiver.
    LanguageUpdate {
        /// The session the update belongs to.
        session_id: SessionId,
        /// The new language.
        language: Language,
    },
}

impl ServerEvent {
    /// Serialize to a JSON text frame.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(self).map_err(ProtocolError::Encode)
    }

    /// Deserialize from a JSON text frame.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(bytes).map_err(ProtocolError::Decode)
    }

    /// The session this event targets.
    pub fn session_id(&self) -> &SessionId {
        match self {
            Self::CodeUpdate { session_id, .. } | Self::LanguageUpdate { session_id, .. } => {
                session_id
            }
        }
    }
}
