//! Switch a session's language.

use anyhow::Result;
use copad_types::Language;

use super::{join_session, wait_for_document};
use crate::config::Config;

/// Run the lang command.
pub async fn run(config: &Config, session_id: &str, language: &str) -> Result<()> {
    let language = Language::parse(language)
        .ok_or_else(|| anyhow::anyhow!("Unsupported language: {language}"))?;

    let client = join_session(config, session_id).await?;

    // The template policy compares against the current document, so the
    // initial code_update must have arrived before switching.
    wait_for_document(&client).await?;
    let before = client.code().await.unwrap_or_default();

    client.set_language(language).await?;

    let after = client.code().await.unwrap_or_default();
    if before == after {
        println!("Session {session_id} switched to {language}, code preserved");
    } else {
        println!("Session {session_id} switched to {language}, template applied");
    }

    client.disconnect().await?;
    Ok(())
}
