//! Configuration loaded once at startup from `gemcoder.toml` plus environment.

pub mod constants;
pub mod loader;
pub mod types;

pub use loader::{ConfigManager, GemcoderConfig};
pub use types::{AgentConfig, CacheConfig, GenerationConfig, ToolsConfig};
