//! Session state machine for copad.
//!
//! This module provides a pure, side-effect-free model of one client's
//! view of a shared session. Transitions take a local edit or a remote
//! event as input and return the events to broadcast; the actual I/O is
//! performed by copad-client, not by this module.
//!
//! The consistency model is deliberately weak: full-text replacement,
//! last writer observed wins. Two concurrent editors can race, and the
//! update that arrives last at a given client overwrites the other's.

use copad_types::{ClientEvent, Language, ServerEvent, SessionId};

/// One client's in-memory view of a shared session.
///
/// Created when the client joins a session and dropped on disconnect.
/// Starts in the loading state; the first remote `code_update` (sent by
/// the backend as part of the join handshake) ends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    session_id: SessionId,
    code: String,
    language: Language,
    output: String,
    loading: bool,
}

impl SessionState {
    /// Create the state for a freshly joined session.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            code: String::new(),
            language: Language::default(),
            output: String::new(),
            loading: true,
        }
    }

    /// The session this state belongs to.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// The current document text.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The current language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// The last execution output (local-only, never broadcast).
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Whether the initial `code_update` is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Record execution output for display.
    pub fn set_output(&mut self, output: impl Into<String>) {
        self.output = output.into();
    }

    /// Apply a user edit (full-text replace) and return the broadcast
    /// to send, if any.
    ///
    /// The echo-suppression guard: an edit carrying the text already
    /// held emits nothing. Editor widgets fire change callbacks on their
    /// own rendered value, and without the guard every remote update
    /// would be re-broadcast by every receiver.
    pub fn local_edit(&mut self, new_code: &str) -> Option<ClientEvent> {
        if new_code == self.code {
            return None;
        }

        // Optimistic local update, no server round-trip.
        self.code = new_code.to_string();

        Some(ClientEvent::CodeChange {
            session_id: self.session_id.clone(),
            code: new_code.to_string(),
        })
    }

    /// Apply a user language selection and return the broadcasts to
    /// send, in order.
    ///
    /// If the document is empty or still equals the previous language's
    /// template (modulo surrounding whitespace), the body is rewritten to
    /// the new language's template and that rewrite is broadcast as a
    /// code change after the language change. A user-modified document is
    /// preserved verbatim. Output is cleared either way; stale output is
    /// meaningless once the language changes.
    pub fn local_language_change(&mut self, new_language: Language) -> Vec<ClientEvent> {
        // The sentinel check must use the language before the switch.
        let previous = self.language;

        self.language = new_language;
        self.output.clear();

        let mut events = vec![ClientEvent::LanguageChange {
            session_id: self.session_id.clone(),
            language: new_language,
        }];

        let trimmed = self.code.trim();
        let untouched = trimmed.is_empty() || trimmed == previous.template().trim();
        if untouched {
            self.code = new_language.template().to_string();
            events.push(ClientEvent::CodeChange {
                session_id: self.session_id.clone(),
                code: self.code.clone(),
            });
        }

        events
    }

    /// Apply a remote event. Returns `true` if the event addressed this
    /// session and was applied, `false` if it was discarded.
    ///
    /// `code_update` replaces code and language wholesale and ends the
    /// loading state. `language_update` sets the language and clears the
    /// output but never touches the code: if the sender also rewrote the
    /// document, its own `code_update` arrives separately.
    pub fn apply_remote(&mut self, event: &ServerEvent) -> bool {
        // The channel may carry other sessions' traffic.
        if event.session_id() != &self.session_id {
            return false;
        }

        match event {
            ServerEvent::CodeUpdate { code, language, .. } => {
                self.code = code.clone();
                self.language = *language;
                self.loading = false;
            }
            ServerEvent::LanguageUpdate { language, .. } => {
                self.language = *language;
                self.output.clear();
            }
        }
        true
    }
}
