use anyhow::{Context, Result};
use console::style;
use gemcoder_core::agent::ToolCallLoop;
use gemcoder_core::config::GemcoderConfig;
use gemcoder_core::llm::{GenerateOptions, ModelAdapter};
use gemcoder_core::session::{AppendOutcome, ConversationTurn, SessionStore};
use gemcoder_core::tool_policy::{ConfirmationGate, ToolPolicy};
use gemcoder_core::tools::ToolRegistry;
use gemcoder_core::ui::{AnsiRenderer, MessageStyle, UserConfirmation};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

use crate::cli::build_adapter;

mod slash_commands;
mod ui;

use slash_commands::{SlashCommandOutcome, handle_slash_command};
use ui::TerminalObserver;

/// Interactive session: read a line, run the tool loop, repeat until quit
pub async fn run_chat_loop(
    config: &GemcoderConfig,
    workspace: &Path,
    auto_approve: bool,
) -> Result<()> {
    let adapter = build_adapter(config)?;
    let registry = ToolRegistry::new(workspace.to_path_buf());
    let gate = ConfirmationGate::default()
        .with_overrides(&config.tools.policies)
        .with_auto_approve(auto_approve);
    let confirmer = UserConfirmation;

    let options = GenerateOptions {
        generation: config.generation.clone(),
        cache: config.cache.clone(),
        ..Default::default()
    };
    let tool_loop = ToolCallLoop::new(&adapter, &registry, &gate, &confirmer)
        .with_options(options)
        .with_max_iterations(config.agent.effective_max_iterations());

    let mut session = SessionStore::with_max_turns(
        config.agent.default_model.clone(),
        config.agent.max_history_turns,
    );
    let mut renderer = AnsiRenderer::stdout();
    render_welcome(&mut renderer, &session, &gate, workspace, adapter.name())?;

    let stdin = io::stdin();
    loop {
        print!("{} ", style(">").cyan().bold());
        io::stdout().flush().ok();

        let mut buf = String::new();
        let read = stdin
            .read_line(&mut buf)
            .context("Failed to read from stdin")?;
        if read == 0 {
            break;
        }

        let input = buf.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "exit" | "quit") {
            break;
        }
        if let Some(command) = input.strip_prefix('/') {
            match handle_slash_command(command, &mut session, &mut renderer)? {
                SlashCommandOutcome::Handled => continue,
                SlashCommandOutcome::Exit => break,
            }
        }

        match session.append(ConversationTurn::user_text(input)) {
            AppendOutcome::Rejected => {
                warn!("user input rejected by session store");
                continue;
            }
            AppendOutcome::Duplicate => debug!("repeated request; reusing existing turn"),
            AppendOutcome::Appended => {}
        }

        let mut observer = TerminalObserver::new(&mut renderer);
        tool_loop.run(&mut session, &mut observer).await;
    }

    renderer.line(MessageStyle::Info, "Goodbye!")?;
    Ok(())
}

fn render_welcome(
    renderer: &mut AnsiRenderer,
    session: &SessionStore,
    gate: &ConfirmationGate,
    workspace: &Path,
    provider: &str,
) -> Result<()> {
    renderer.line(MessageStyle::User, "gemcoder")?;
    renderer.line(
        MessageStyle::Info,
        &format!("Model: {} ({provider})", session.model()),
    )?;
    renderer.line(
        MessageStyle::Info,
        &format!("Workspace: {}", workspace.display()),
    )?;

    let prompted: Vec<String> = gate
        .policies()
        .filter(|(_, policy)| *policy == ToolPolicy::Prompt)
        .map(|(tool, _)| tool.to_string())
        .collect();
    if gate.auto_approve() {
        renderer.line(MessageStyle::Warning, "Auto-approve is on: tools run without confirmation")?;
    } else if !prompted.is_empty() {
        renderer.line(
            MessageStyle::Info,
            &format!("Confirmation required for: {}", prompted.join(", ")),
        )?;
    }
    renderer.line(MessageStyle::Info, "Type /help for commands, /quit to exit.")?;
    Ok(())
}
