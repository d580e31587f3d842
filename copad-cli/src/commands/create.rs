//! Mint a new session.

use anyhow::{Context, Result};
use copad_client::SessionApi;

use crate::config::Config;

/// Run the create command.
pub async fn run(config: &Config) -> Result<()> {
    let api = SessionApi::new(&config.base_url);

    let session_id = api
        .create_session()
        .await
        .context("Failed to create a session. Is the backend running?")?;

    println!("Created session: {session_id}");
    println!("Join it with: copad join {session_id}");
    Ok(())
}
