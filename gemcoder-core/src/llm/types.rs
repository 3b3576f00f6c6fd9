use crate::config::{CacheConfig, GenerationConfig};
use crate::session::{ConversationTurn, FunctionCallPart};
use crate::tools::FunctionDeclaration;

/// What a single `generate` call sends
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateInput {
    /// A bare prompt sent as one user message
    Prompt(String),
    /// A full conversation, oldest turn first
    Conversation(Vec<ConversationTurn>),
}

impl From<&str> for GenerateInput {
    fn from(prompt: &str) -> Self {
        GenerateInput::Prompt(prompt.to_string())
    }
}

impl From<String> for GenerateInput {
    fn from(prompt: String) -> Self {
        GenerateInput::Prompt(prompt)
    }
}

impl From<Vec<ConversationTurn>> for GenerateInput {
    fn from(turns: Vec<ConversationTurn>) -> Self {
        GenerateInput::Conversation(turns)
    }
}

/// Pass-through knobs for a model call
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Overrides the adapter's default model
    pub model: Option<String>,
    pub generation: GenerationConfig,
    pub cache: CacheConfig,
    pub system_instruction: Option<String>,
    /// Functions advertised to the model; empty means no tools
    pub tools: Vec<FunctionDeclaration>,
}

impl GenerateOptions {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<FunctionDeclaration>) -> Self {
        self.tools = tools;
        self
    }
}

/// Structured result of one model call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelReply {
    pub text: Option<String>,
    pub function_call: Option<FunctionCallPart>,
    pub finish_reason: Option<String>,
}

impl ModelReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn call(name: impl Into<String>, args: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            function_call: Some(FunctionCallPart {
                name: name.into(),
                args,
            }),
            ..Default::default()
        }
    }

    /// Non-empty text, if any
    pub fn visible_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.trim().is_empty())
    }
}
