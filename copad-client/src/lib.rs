//! # copad-client
//!
//! Client library for copad collaborative editing sessions.
//!
//! This is the I/O shell around [`copad_core`]: it owns the duplex
//! channel to the session backend, forwards the broadcasts the state
//! machine decides on, and filters inbound traffic.
//!
//! ## Features
//!
//! - **Transport Abstraction**: Pluggable channel layer (WebSocket, mock)
//! - **Pure State Machine**: Uses copad-core for side-effect-free logic
//! - **REST Bootstrap**: Mint and check sessions over the backend's API
//!
//! ## Example
//!
//! ```ignore
//! use copad_client::{SessionClient, WsTransport};
//! use copad_types::{Language, SessionId};
//!
//! let client = SessionClient::new(WsTransport::new());
//! client.connect("ws://localhost:8000/ws", SessionId::new("abc")).await?;
//!
//! client.edit("console.log(1)").await?;
//! client.set_language(Language::Python).await?;
//!
//! while let Some(event) = client.process_incoming().await? {
//!     println!("document is now {:?}", client.code().await);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bootstrap;
pub mod client;
pub mod transport;

pub use bootstrap::{ApiError, SessionApi, DEFAULT_BASE_URL};
pub use client::{ClientError, SessionClient};
pub use transport::{MockTransport, Transport, TransportError, WsTransport};
