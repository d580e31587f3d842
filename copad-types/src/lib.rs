//! # copad-types
//!
//! Wire format types for the copad collaborative session protocol.
//!
//! This crate provides the foundational types used across all copad crates:
//! - [`SessionId`] - Opaque, backend-assigned session identifier
//! - [`Language`] - The four supported languages plus their code templates
//! - [`ClientEvent`], [`ServerEvent`] - Protocol events (JSON text frames)
//! - [`ProtocolError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod events;
mod ids;
mod language;

pub use error::ProtocolError;
pub use events::{ClientEvent, ServerEvent};
pub use ids::SessionId;
pub use language::Language;
