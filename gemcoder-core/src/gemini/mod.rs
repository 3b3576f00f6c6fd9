//! Gemini REST wire types and HTTP client

pub mod client;
pub mod models;

pub use client::Client;
pub use models::{
    Candidate, Content, FunctionCall, FunctionResponse, GenerateContentRequest,
    GenerateContentResponse, GenerationParams, Part, PromptFeedback, SafetySetting, Tool,
    ToolConfig,
};
