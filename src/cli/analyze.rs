use super::build_adapter;
use anyhow::{Context, Result};
use console::style;
use gemcoder_core::config::GemcoderConfig;
use gemcoder_core::llm::{GenerateInput, GenerateOptions, ModelAdapter};
use gemcoder_core::ui::{AnsiRenderer, MessageStyle, Spinner};
use gemcoder_core::utils::{ScanOptions, scan_project};
use std::path::Path;

const OVERVIEW_REQUEST: &str = "Give a concise overview of this project: its purpose, main components, \
languages and build tooling, and anything that looks unfinished or risky.";

/// Scan the workspace and ask the model for an overview
pub async fn handle_analyze_command(
    config: &GemcoderConfig,
    workspace: &Path,
    max_files: Option<usize>,
) -> Result<()> {
    println!("{}", style("Analyzing workspace").blue().bold());
    println!("Workspace: {}", workspace.display());

    let mut options = ScanOptions::default();
    if let Some(max_files) = max_files {
        options.max_files = max_files;
    }
    let scan = scan_project(workspace, &options)
        .with_context(|| format!("Failed to scan {}", workspace.display()))?;

    println!("  Files: {}{}", scan.files.len(), if scan.truncated { " (truncated)" } else { "" });
    for (ext, count) in scan.extension_counts.iter().take(10) {
        println!("    {ext}: {count} files");
    }

    let adapter = build_adapter(config)?;
    let prompt = format!("{}\n\n{}", scan.render_prompt(), OVERVIEW_REQUEST);
    let generate_options = GenerateOptions {
        generation: config.generation.clone(),
        cache: config.cache.clone(),
        ..Default::default()
    };

    let spinner = Spinner::new("Summarizing project...");
    let result = adapter
        .generate(GenerateInput::Prompt(prompt), &generate_options)
        .await;
    spinner.finish_and_clear();

    let reply = result?;
    let mut renderer = AnsiRenderer::stdout();
    renderer.line(MessageStyle::Info, "")?;
    renderer.block(
        MessageStyle::Response,
        reply.visible_text().unwrap_or("(no response)"),
    )?;
    Ok(())
}
