//! # copad-cli
//!
//! CLI for copad collaborative editing sessions.
//!
//! ## Commands
//!
//! - `create`: Mint a new session on the backend
//! - `join`: Join a session and watch it converge
//! - `push`: Push a file into a session as an edit
//! - `lang`: Switch a session's language
//! - `run`: Execute a file and print the outcome
//!
//! ## Example
//!
//! ```bash
//! # Mint a session
//! copad create
//!
//! # Watch it from another terminal
//! copad join <session-id>
//!
//! # Push an edit into it
//! copad push <session-id> --file main.py
//!
//! # Switch the language
//! copad lang <session-id> python
//!
//! # Run code locally / via the execution service
//! copad run --file main.py --language python
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{create, join, lang, push, run};
use config::Config;

/// CLI for copad collaborative editing sessions.
#[derive(Parser, Debug)]
#[command(name = "copad")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Backend base URL (default: http://localhost:8000, or COPAD_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mint a new session on the backend
    Create,

    /// Join a session and print updates as they arrive
    Join {
        /// Session id to join
        session_id: String,
    },

    /// Push a file into a session as a full-text edit
    Push {
        /// Session id to push into
        session_id: String,

        /// File with the new document text
        #[arg(long, short)]
        file: PathBuf,
    },

    /// Switch a session's language
    Lang {
        /// Session id to switch
        session_id: String,

        /// New language (javascript, python, go, java)
        language: String,
    },

    /// Execute a file and print the outcome
    Run {
        /// File with the code to execute
        #[arg(long, short)]
        file: PathBuf,

        /// Language to execute under
        #[arg(long, short)]
        language: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.base_url);

    match cli.command {
        Commands::Create => create::run(&config).await,
        Commands::Join { session_id } => join::run(&config, &session_id).await,
        Commands::Push { session_id, file } => push::run(&config, &session_id, &file).await,
        Commands::Lang {
            session_id,
            language,
        } => lang::run(&config, &session_id, &language).await,
        Commands::Run { file, language } => run::run(&config, &file, &language).await,
    }
}
