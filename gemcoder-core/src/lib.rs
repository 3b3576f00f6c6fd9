//! gemcoder core library
//!
//! The pieces of the gemcoder agent that do not depend on the CLI:
//!
//! - [`session`]: the owned conversation history and active model
//! - [`tools`]: the built-in tool set and its registry
//! - [`tool_policy`]: the confirmation gate in front of risky tools
//! - [`llm`] / [`gemini`]: the model adapter and its Gemini wire implementation
//! - [`agent`]: the tool-call loop that ties them together

pub mod agent;
pub mod config;
pub mod gemini;
pub mod llm;
pub mod session;
pub mod tool_policy;
pub mod tools;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use agent::{LoopExit, LoopObserver, LoopReport, NoopObserver, ToolCallLoop};
pub use config::{ConfigManager, GemcoderConfig};
pub use llm::{AdapterError, GeminiAdapter, GenerateInput, GenerateOptions, ModelAdapter, ModelReply};
pub use session::{ConversationTurn, SessionStore, TurnRole};
pub use tool_policy::{ConfirmationGate, Confirmer, ToolPolicy};
pub use tools::{ToolName, ToolOutcome, ToolRegistry};
