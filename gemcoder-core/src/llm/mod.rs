//! Model adapter abstraction
//!
//! The tool-call loop talks to the model only through [`ModelAdapter`]. The
//! Gemini implementation lives in [`gemini`]; tests substitute scripted adapters.

pub mod error;
pub mod gemini;
pub mod types;

pub use error::AdapterError;
pub use gemini::GeminiAdapter;
pub use types::{GenerateInput, GenerateOptions, ModelReply};

use async_trait::async_trait;

#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// One remote call. At most one function call is returned per reply.
    async fn generate(
        &self,
        input: GenerateInput,
        options: &GenerateOptions,
    ) -> Result<ModelReply, AdapterError>;
}
