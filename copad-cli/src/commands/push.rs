//! Push a file into a session as a full-text edit.

use anyhow::{Context, Result};
use std::path::Path;

use super::{join_session, wait_for_document};
use crate::config::Config;

/// Run the push command.
pub async fn run(config: &Config, session_id: &str, file: &Path) -> Result<()> {
    let code = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let client = join_session(config, session_id).await?;
    wait_for_document(&client).await?;

    if client.edit(&code).await? {
        println!("Pushed {} bytes to session {session_id}", code.len());
    } else {
        // The echo-suppression guard: the session already holds this text.
        println!("Session {session_id} already has this content, nothing sent");
    }

    client.disconnect().await?;
    Ok(())
}
