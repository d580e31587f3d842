//! Execute a file and print the outcome.

use anyhow::{Context, Result};
use copad_exec::Executor;
use std::path::Path;

use crate::config::Config;

/// Run the run command.
pub async fn run(config: &Config, file: &Path, language: &str) -> Result<()> {
    let code = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let executor = Executor::new(&config.base_url);
    let outcome = executor.execute(&code, language).await;

    match outcome.error {
        Some(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
        None if outcome.output.is_empty() => {
            println!("Code executed successfully (no output)");
        }
        None => {
            print!("{}", outcome.output);
        }
    }
    Ok(())
}
