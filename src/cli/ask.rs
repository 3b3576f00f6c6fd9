use super::build_adapter;
use anyhow::Result;
use gemcoder_core::config::GemcoderConfig;
use gemcoder_core::llm::{GenerateInput, GenerateOptions, ModelAdapter};
use gemcoder_core::ui::{AnsiRenderer, MessageStyle, Spinner};

/// Send one prompt without tools and print the reply
pub async fn handle_ask_command(config: &GemcoderConfig, prompt: &str) -> Result<()> {
    let adapter = build_adapter(config)?;
    let options = GenerateOptions {
        generation: config.generation.clone(),
        cache: config.cache.clone(),
        ..Default::default()
    };

    let spinner = Spinner::new("Thinking...");
    let result = adapter
        .generate(GenerateInput::Prompt(prompt.to_string()), &options)
        .await;
    spinner.finish_and_clear();

    let mut renderer = AnsiRenderer::stdout();
    match result {
        Ok(reply) => {
            let text = reply.visible_text().unwrap_or("(no response)");
            renderer.block(MessageStyle::Response, text)?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
