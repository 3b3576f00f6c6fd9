//! gemcoder CLI entrypoint

mod agent;
mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use gemcoder_core::config::ConfigManager;
use std::path::Path;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let workspace = match &args.workspace {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("cannot determine current dir")?,
    };

    if let Err(err) = load_workspace_env(&workspace) {
        warn!(error = %err, "failed to load .env");
    }

    let mut manager = ConfigManager::load(&workspace, args.config.as_deref())?;
    manager
        .config_mut()
        .apply_env_overrides(|name| std::env::var(name).ok());
    args.apply_overrides(manager.config_mut());
    debug!(config = ?manager.config(), "effective configuration");

    let config = manager.config();
    match args.command.clone().unwrap_or(Commands::Chat) {
        Commands::Chat => agent::run_chat_loop(config, &workspace, args.yes).await,
        Commands::Ask { prompt } => cli::handle_ask_command(config, &prompt.join(" ")).await,
        Commands::Analyze { max_files } => {
            cli::handle_analyze_command(config, &workspace, max_files).await
        }
        Commands::Config {
            init,
            force,
            output,
        } => cli::handle_config_command(
            config,
            manager.config_path(),
            &workspace,
            init,
            force,
            output,
        ),
    }
}

/// Logs go to stderr so they never mix with the transcript
fn init_tracing(verbose: bool) {
    let default_directives = if verbose {
        "warn,gemcoder=debug,gemcoder_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load `<workspace>/.env` so the API key comes from the same tree as the config.
/// A missing file is not an error.
fn load_workspace_env(workspace: &Path) -> Result<bool, dotenvy::Error> {
    let path = workspace.join(".env");
    match dotenvy::from_path(&path) {
        Ok(()) => {
            debug!(path = %path.display(), "loaded environment file");
            Ok(true)
        }
        Err(err) if err.not_found() => Ok(false),
        Err(err) => Err(err),
    }
}
