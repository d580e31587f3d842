//! # copad-core
//!
//! Pure reconciliation logic for one collaborative copad session.
//!
//! This crate holds the state transitions that keep a client's
//! `(code, language)` converging with its peers: echo-suppressed local
//! edits, the template-sentinel policy on language switches, and the
//! foreign-session filter on remote events. There is no I/O here; every
//! transition returns the [`copad_types::ClientEvent`]s the caller must
//! broadcast, which makes the whole protocol testable without mocks.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod session;

pub use session::SessionState;
