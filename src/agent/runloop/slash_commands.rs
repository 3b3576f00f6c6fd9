use anyhow::Result;
use gemcoder_core::config::constants::models;
use gemcoder_core::session::{ConversationTurn, Part, SessionStore};
use gemcoder_core::ui::{AnsiRenderer, MessageStyle};

pub enum SlashCommandOutcome {
    Handled,
    Exit,
}

const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("model [id]", "Show or switch the active model"),
    ("history", "Show the conversation history"),
    ("clear", "Clear the conversation history"),
    ("help", "Show this help"),
    ("quit", "Exit gemcoder (alias: /exit)"),
];

/// Handle a meta-command. `input` is the text after the leading `/`.
pub fn handle_slash_command(
    input: &str,
    session: &mut SessionStore,
    renderer: &mut AnsiRenderer,
) -> Result<SlashCommandOutcome> {
    let mut parts = input.split_whitespace();
    let command = parts.next().unwrap_or("").to_lowercase();

    match command.as_str() {
        "model" => {
            match parts.next() {
                Some(model) => {
                    if !models::is_known(model) {
                        renderer.line(
                            MessageStyle::Warning,
                            &format!("'{model}' is not in the known model list; using it anyway"),
                        )?;
                    }
                    session.set_model(model);
                    renderer.line(MessageStyle::Info, &format!("Model switched to {model}"))?;
                }
                None => {
                    renderer.line(
                        MessageStyle::Info,
                        &format!("Current model: {}", session.model()),
                    )?;
                    renderer.line(MessageStyle::Info, "Known models:")?;
                    for model in models::SUPPORTED_MODELS {
                        let marker = if *model == session.model() { "*" } else { " " };
                        renderer.line(MessageStyle::Info, &format!("{marker} {model}"))?;
                    }
                }
            }
            Ok(SlashCommandOutcome::Handled)
        }
        "history" => {
            if session.is_empty() {
                renderer.line(MessageStyle::Info, "History is empty")?;
            }
            for (index, turn) in session.history().iter().enumerate() {
                renderer.line(
                    MessageStyle::Info,
                    &format!("{:>3}. [{}] {}", index + 1, turn.role, summarize(turn)),
                )?;
            }
            Ok(SlashCommandOutcome::Handled)
        }
        "clear" => {
            session.clear();
            renderer.line(MessageStyle::Info, "Conversation history cleared")?;
            Ok(SlashCommandOutcome::Handled)
        }
        "help" => {
            renderer.line(MessageStyle::Info, "Available commands:")?;
            for (name, description) in SLASH_COMMANDS {
                renderer.line(MessageStyle::Info, &format!("  /{name} - {description}"))?;
            }
            Ok(SlashCommandOutcome::Handled)
        }
        "quit" | "exit" => Ok(SlashCommandOutcome::Exit),
        _ => {
            renderer.line(
                MessageStyle::Error,
                &format!("Unknown command '/{command}'. Try /help."),
            )?;
            Ok(SlashCommandOutcome::Handled)
        }
    }
}

fn summarize(turn: &ConversationTurn) -> String {
    let pieces: Vec<String> = turn
        .parts
        .iter()
        .map(|part| match part {
            Part::Text { text } => truncate(text, 80),
            Part::FunctionCall(call) => format!("call {}", call.name),
            Part::FunctionResponse { name, result } => {
                let status = if result.success { "ok" } else { "failed" };
                format!("{name} -> {status}")
            }
        })
        .collect();
    pieces.join(" | ")
}

fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        single_line
    } else {
        let cut: String = single_line.chars().take(max).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemcoder_core::tools::ToolOutcome;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn renderer() -> (AnsiRenderer, SharedBuf) {
        let buf = SharedBuf::default();
        (AnsiRenderer::with_writer(Box::new(buf.clone()), false), buf)
    }

    #[test]
    fn model_command_switches_without_touching_history() -> Result<()> {
        let (mut renderer, out) = renderer();
        let mut session = SessionStore::new("gemini-2.5-flash");
        session.append(ConversationTurn::user_text("hi"));

        handle_slash_command("model gemini-2.5-pro", &mut session, &mut renderer)?;
        assert_eq!(session.model(), "gemini-2.5-pro");
        assert_eq!(session.len(), 1);

        handle_slash_command("model my-custom-model", &mut session, &mut renderer)?;
        assert_eq!(session.model(), "my-custom-model");
        assert!(out.text().contains("not in the known model list"));
        Ok(())
    }

    #[test]
    fn clear_keeps_model_and_history_lists_turns() -> Result<()> {
        let (mut renderer, out) = renderer();
        let mut session = SessionStore::new("gemini-2.5-flash");
        session.append(ConversationTurn::user_text("make notes"));
        session.append(ConversationTurn::tool_result(
            "create_file",
            ToolOutcome::success("ok"),
        ));

        handle_slash_command("history", &mut session, &mut renderer)?;
        let listing = out.text();
        assert!(listing.contains("[user] make notes"));
        assert!(listing.contains("create_file -> ok"));

        handle_slash_command("clear", &mut session, &mut renderer)?;
        assert!(session.is_empty());
        assert_eq!(session.model(), "gemini-2.5-flash");
        Ok(())
    }

    #[test]
    fn quit_and_exit_end_the_session() -> Result<()> {
        let (mut renderer, _) = renderer();
        let mut session = SessionStore::new("gemini-2.5-flash");
        assert!(matches!(
            handle_slash_command("quit", &mut session, &mut renderer)?,
            SlashCommandOutcome::Exit
        ));
        assert!(matches!(
            handle_slash_command("exit", &mut session, &mut renderer)?,
            SlashCommandOutcome::Exit
        ));
        assert!(matches!(
            handle_slash_command("bogus", &mut session, &mut renderer)?,
            SlashCommandOutcome::Handled
        ));
        Ok(())
    }
}
