//! CLI command implementations.

pub mod create;
pub mod join;
pub mod lang;
pub mod push;
pub mod run;

use anyhow::{Context, Result};
use copad_client::{SessionClient, Transport, WsTransport};
use copad_types::SessionId;

use crate::config::Config;

/// Check the session exists, connect, and join it.
///
/// Both a negative existence check and a network failure route to the
/// "not found" outcome; an unreachable backend cannot host the session.
pub(crate) async fn join_session(
    config: &Config,
    session_id: &str,
) -> Result<SessionClient<WsTransport>> {
    let api = copad_client::SessionApi::new(&config.base_url);
    let session_id = SessionId::new(session_id);

    let exists = api.session_exists(&session_id).await.unwrap_or(false);
    if !exists {
        anyhow::bail!("Session not found: {session_id}");
    }

    let client = SessionClient::new(WsTransport::new());
    client
        .connect(&config.ws_url(), session_id)
        .await
        .context("Failed to connect to the session channel")?;
    Ok(client)
}

/// Process inbound events until the initial `code_update` arrives.
///
/// Joining is only acknowledged by that first update, so commands that
/// depend on the current document (the template policy) wait here.
pub(crate) async fn wait_for_document<T: Transport>(client: &SessionClient<T>) -> Result<()> {
    while client.is_loading().await {
        client
            .process_incoming()
            .await
            .context("Channel closed before the session state arrived")?;
    }
    Ok(())
}
