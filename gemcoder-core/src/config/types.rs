use crate::config::constants::{defaults, env, models, urls};
use crate::tool_policy::ToolPolicy;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Agent-wide settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    /// Model used when the session starts
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Upper bound on model calls for a single user request
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Number of turns retained in the session history
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,

    /// Gemini REST endpoint root
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_model() -> String {
    models::DEFAULT_MODEL.to_string()
}
fn default_api_key_env() -> String {
    env::DEFAULT_API_KEY_ENV.to_string()
}
fn default_max_iterations() -> usize {
    defaults::MAX_ITERATIONS
}
fn default_max_history_turns() -> usize {
    defaults::MAX_HISTORY_TURNS
}
fn default_base_url() -> String {
    urls::GEMINI_API_BASE.to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            api_key_env: default_api_key_env(),
            max_iterations: default_max_iterations(),
            max_history_turns: default_max_history_turns(),
            base_url: default_base_url(),
        }
    }
}

impl AgentConfig {
    /// Iteration budget clamped to the supported range
    pub fn effective_max_iterations(&self) -> usize {
        self.max_iterations
            .clamp(defaults::MIN_ITERATIONS, defaults::MAX_ITERATIONS_CAP)
    }
}

/// Generation parameters passed through to the model untouched
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    /// Threshold applied to every harm category, e.g. "BLOCK_MEDIUM_AND_ABOVE"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_threshold: Option<String>,
}

/// Provider cache hints
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Name of a Gemini cachedContent resource to attach to every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_content: Option<String>,
}

/// Tool confirmation overrides
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Per-tool policy, merged over the built-in table
    #[serde(default)]
    pub policies: IndexMap<String, ToolPolicy>,
}
