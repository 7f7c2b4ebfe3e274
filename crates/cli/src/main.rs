//! ScenePilot CLI — the main entry point.
//!
//! Commands:
//! - `chat`   — Send a message through the orchestration loop
//! - `tools`  — List the registered tool catalog
//! - `config` — Show the active configuration or print a default file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod session_store;

#[derive(Parser)]
#[command(
    name = "scenepilot",
    about = "ScenePilot — a tool-calling LLM assistant for scene editing",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a message and run the conversation until the model answers
    Chat {
        /// The user message
        #[arg(short, long)]
        message: String,

        /// Session file to resume and save back to
        #[arg(short, long)]
        session: Option<PathBuf>,

        /// Name for a newly created session
        #[arg(long, default_value = "New Chat")]
        name: String,

        /// Disable tool use for this run
        #[arg(long)]
        no_tools: bool,
    },

    /// List the registered tools
    Tools,

    /// Show configuration
    Config {
        /// Print a default config.toml instead of the active values
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat {
            message,
            session,
            name,
            no_tools,
        } => commands::chat::run(message, session, name, no_tools).await?,
        Commands::Tools => commands::tools_cmd::run()?,
        Commands::Config { default } => commands::config_cmd::run(default)?,
    }

    Ok(())
}
