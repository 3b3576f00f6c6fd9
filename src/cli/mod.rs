pub mod analyze;
pub mod args;
pub mod ask;
pub mod config;

pub use analyze::handle_analyze_command;
pub use args::{Cli, Commands};
pub use ask::handle_ask_command;
pub use config::handle_config_command;

use anyhow::Result;
use gemcoder_core::config::GemcoderConfig;
use gemcoder_core::llm::{AdapterError, GeminiAdapter};

/// Build the Gemini adapter from configuration and the process environment
pub fn build_adapter(config: &GemcoderConfig) -> Result<GeminiAdapter> {
    let api_key = config
        .resolve_api_key(|name| std::env::var(name).ok())
        .ok_or_else(|| AdapterError::MissingApiKey {
            env_var: config.agent.api_key_env.clone(),
        })?;

    Ok(GeminiAdapter::with_base_url(
        api_key,
        config.agent.base_url.clone(),
        config.agent.default_model.clone(),
    ))
}
