use crate::config::constants::{defaults, env};
use crate::config::types::{AgentConfig, CacheConfig, GenerationConfig, ToolsConfig};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Main configuration structure for gemcoder
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GemcoderConfig {
    /// Agent-wide settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Generation parameters and safety thresholds
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Provider cache hints
    #[serde(default)]
    pub cache: CacheConfig,

    /// Tool confirmation overrides
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl GemcoderConfig {
    /// Apply environment overrides on top of the file values.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup(env::MODEL_OVERRIDE) {
            let model = model.trim();
            if !model.is_empty() {
                debug!(model, "model overridden from environment");
                self.agent.default_model = model.to_string();
            }
        }

        if let Some(raw) = lookup(env::MAX_ITERATIONS_OVERRIDE) {
            match raw.trim().parse::<usize>() {
                Ok(value) if value > 0 => self.agent.max_iterations = value,
                _ => warn!(
                    value = raw.as_str(),
                    "ignoring invalid {}",
                    env::MAX_ITERATIONS_OVERRIDE
                ),
            }
        }
    }

    /// Resolve the API key from the configured variable, falling back to GOOGLE_API_KEY
    pub fn resolve_api_key<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&self.agent.api_key_env)
            .or_else(|| lookup(env::FALLBACK_API_KEY_ENV))
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    /// Write a sample configuration file
    pub fn create_sample_config(output: &Path, force: bool) -> Result<()> {
        if output.exists() && !force {
            bail!(
                "{} already exists; pass --force to overwrite it",
                output.display()
            );
        }

        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(&GemcoderConfig::default())
            .context("Failed to serialize default configuration")?;
        fs::write(output, content)
            .with_context(|| format!("Failed to write config file: {}", output.display()))?;
        Ok(())
    }
}

/// Configuration manager for loading configuration once at startup
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: GemcoderConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration for a workspace.
    ///
    /// An explicit path must exist. Otherwise the workspace file, the workspace
    /// `.gemcoder/` directory and `~/.gemcoder/` are tried in that order.
    pub fn load(workspace: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        for candidate in Self::candidate_paths(workspace) {
            if candidate.exists() {
                return Self::load_from_file(&candidate);
            }
        }

        debug!("no configuration file found; using defaults");
        Ok(Self {
            config: GemcoderConfig::default(),
            config_path: None,
        })
    }

    fn candidate_paths(workspace: &Path) -> Vec<PathBuf> {
        let mut paths = vec![
            workspace.join(defaults::CONFIG_FILE_NAME),
            workspace
                .join(defaults::CONFIG_DIR_NAME)
                .join(defaults::CONFIG_FILE_NAME),
        ];
        if let Some(home) = dirs::home_dir() {
            paths.push(
                home.join(defaults::CONFIG_DIR_NAME)
                    .join(defaults::CONFIG_FILE_NAME),
            );
        }
        paths
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: GemcoderConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        debug!(path = %path.display(), "loaded configuration");

        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    pub fn config(&self) -> &GemcoderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut GemcoderConfig {
        &mut self.config
    }

    /// Path of the file the configuration came from, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
