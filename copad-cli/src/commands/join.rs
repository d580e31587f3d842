//! Join a session and watch it converge.

use anyhow::Result;
use copad_types::ServerEvent;
use tracing::info;

use super::{join_session, wait_for_document};
use crate::config::Config;

/// Run the join command: join, print the document, then stream updates
/// until Ctrl-C.
pub async fn run(config: &Config, session_id: &str) -> Result<()> {
    let client = join_session(config, session_id).await?;
    info!(session = session_id, "joined session");

    wait_for_document(&client).await?;
    print_document(&client).await;

    loop {
        tokio::select! {
            event = client.process_incoming() => {
                match event? {
                    Some(ServerEvent::CodeUpdate { .. }) => {
                        print_document(&client).await;
                    }
                    Some(ServerEvent::LanguageUpdate { language, .. }) => {
                        println!("--- language changed to {language} ---");
                    }
                    // Malformed or foreign-session frame, already traced.
                    None => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    client.disconnect().await?;
    println!("Left session {session_id}");
    Ok(())
}

async fn print_document(client: &copad_client::SessionClient<copad_client::WsTransport>) {
    let language = client.language().await.map(|l| l.to_string());
    println!(
        "--- document ({}) ---",
        language.as_deref().unwrap_or("unknown")
    );
    println!("{}", client.code().await.unwrap_or_default());
}
