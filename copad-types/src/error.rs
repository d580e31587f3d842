//! Error types for the copad protocol.

use thiserror::Error;

/// Errors that can occur encoding or decoding protocol events.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// JSON serialization failed
    #[error("encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// JSON deserialization failed
    #[error("decoding failed: {0}")]
    Decode(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProtocolError>();
    }
}
