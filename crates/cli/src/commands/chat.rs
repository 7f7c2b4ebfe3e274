//! `scenepilot chat` — run one conversation turn through the loop.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use tracing::debug;

use scenepilot_config::AppConfig;
use scenepilot_core::message::Message;
use scenepilot_core::session::Session;
use scenepilot_core::tool::ToolRegistry;
use scenepilot_orchestrator::{ChatOrchestrator, RunControls, RunOutcome};
use scenepilot_protocol::HttpTransport;
use scenepilot_tools::{builtin_tools, SceneGraph};

use crate::session_store;

pub async fn run(
    message: String,
    session_path: Option<PathBuf>,
    name: String,
    no_tools: bool,
) -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    if config.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    SCENEPILOT_API_KEY = 'sk-...'");
        eprintln!("    OPENAI_API_KEY     = 'sk-...'");
        eprintln!();
        eprintln!("  Or add api_key to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        bail!("No API key found. See above for setup instructions.");
    }

    let transport = Arc::new(HttpTransport::from_config(&config)?);
    let registry = Arc::new(ToolRegistry::new());
    registry.discover(builtin_tools(Arc::new(SceneGraph::new())));

    let orchestrator = ChatOrchestrator::new(transport, registry, &config)
        .with_tools_enabled(config.tools_enabled && !no_tools);

    // Resume the newest session in the store, or start fresh.
    let mut stored = match &session_path {
        Some(path) => session_store::load(path)?,
        None => Vec::new(),
    };
    let mut session = stored.pop().unwrap_or_else(|| Session::new(name));

    session.append(Message::user(message));

    let checkpoint = |iteration: u32| debug!(iteration, "checkpoint before tool execution");
    let outcome = orchestrator
        .run(
            &mut session,
            RunControls {
                cancel: None,
                checkpoint: Some(&checkpoint),
            },
        )
        .await?;

    if let Some(path) = &session_path {
        session_store::upsert(&mut stored, session.clone());
        session_store::save(path, &stored)?;
    }

    match outcome {
        RunOutcome::Completed(usage) => {
            if let Some(last) = session.messages().last() {
                println!("{}", last.text());
            }
            println!();
            println!(
                "[{} | {} prompt + {} completion = {} tokens]",
                session.display_name(),
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }
        RunOutcome::Cancelled(_) => {
            println!("(cancelled — session saved, run again to resume)");
        }
    }

    Ok(())
}
