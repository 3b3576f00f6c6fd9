use anyhow::{Context, Result};
use console::style;
use gemcoder_core::config::GemcoderConfig;
use gemcoder_core::config::constants::defaults;
use std::path::{Path, PathBuf};

/// Print the effective configuration, or write a sample file with `init`
pub fn handle_config_command(
    config: &GemcoderConfig,
    source: Option<&Path>,
    workspace: &Path,
    init: bool,
    force: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    if init {
        let output = output.unwrap_or_else(|| workspace.join(defaults::CONFIG_FILE_NAME));
        GemcoderConfig::create_sample_config(&output, force)?;
        println!(
            "{} {}",
            style("Wrote sample configuration to").green(),
            output.display()
        );
        return Ok(());
    }

    match source {
        Some(path) => println!("{} {}", style("# Loaded from").dim(), path.display()),
        None => println!("{}", style("# No config file found; showing defaults").dim()),
    }
    let rendered =
        toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    println!("{rendered}");
    Ok(())
}
