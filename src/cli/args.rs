//! CLI argument parsing

use clap::{Parser, Subcommand};
use gemcoder_core::config::GemcoderConfig;
use std::path::PathBuf;

/// Main CLI structure for gemcoder
#[derive(Parser, Debug)]
#[command(
    name = "gemcoder",
    version,
    about = "Terminal coding agent powered by Gemini function calling"
)]
pub struct Cli {
    /// Gemini model ID, e.g. gemini-2.5-flash (overrides the config file)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// API key environment variable to read (GOOGLE_API_KEY is the fallback)
    #[arg(long, global = true)]
    pub api_key_env: Option<String>,

    /// Workspace root directory; defaults to current directory
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Maximum model calls per request (clamped to 5..=10)
    #[arg(long, global = true)]
    pub max_iterations: Option<usize>,

    /// Approve tools that would normally ask for confirmation
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Interactive session with tool calling (default)
    Chat,

    /// Single prompt; prints the model reply without tools
    Ask {
        /// The prompt to send to the model
        #[arg(required = true)]
        prompt: Vec<String>,
    },

    /// Scan the workspace and ask the model for a project overview
    Analyze {
        /// Maximum number of files to include
        #[arg(long)]
        max_files: Option<usize>,
    },

    /// Show the effective configuration or write a sample file
    Config {
        /// Write a sample gemcoder.toml instead of printing
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long)]
        force: bool,

        /// Where to write the sample (defaults to <workspace>/gemcoder.toml)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Flags take precedence over file and environment values
    pub fn apply_overrides(&self, config: &mut GemcoderConfig) {
        if let Some(model) = &self.model {
            config.agent.default_model = model.clone();
        }
        if let Some(env) = &self.api_key_env {
            config.agent.api_key_env = env.clone();
        }
        if let Some(max) = self.max_iterations {
            config.agent.max_iterations = max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_no_subcommand() {
        let cli = Cli::parse_from(["gemcoder"]);
        assert!(cli.command.is_none());
        assert!(!cli.yes);
    }

    #[test]
    fn flags_override_config_values() {
        let cli = Cli::parse_from([
            "gemcoder",
            "--model",
            "gemini-2.5-pro",
            "--max-iterations",
            "9",
            "-y",
            "ask",
            "hello",
            "there",
        ]);
        let mut config = GemcoderConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.agent.default_model, "gemini-2.5-pro");
        assert_eq!(config.agent.max_iterations, 9);
        assert_eq!(config.agent.api_key_env, "GEMINI_API_KEY");
        assert!(cli.yes);
        assert!(matches!(cli.command, Some(Commands::Ask { ref prompt }) if prompt.len() == 2));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
