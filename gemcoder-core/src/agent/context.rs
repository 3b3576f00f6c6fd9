//! Ephemeral planning context for outgoing requests

use crate::session::{ConversationTurn, SessionState, TurnRole};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Static facts injected ahead of the user's request
#[derive(Debug, Clone)]
pub struct PlanningContext {
    working_dir: PathBuf,
    catalog: Vec<(&'static str, &'static str)>,
}

impl PlanningContext {
    pub fn new(working_dir: impl Into<PathBuf>, catalog: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            working_dir: working_dir.into(),
            catalog,
        }
    }

    pub fn render(&self, goal: &str) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "You are a coding agent operating on the user's machine.");
        let _ = writeln!(text, "Working directory: {}", self.working_dir.display());
        let _ = writeln!(text, "User goal: {goal}");
        let _ = writeln!(text);
        let _ = writeln!(text, "Available tools:");
        for (name, description) in &self.catalog {
            let _ = writeln!(text, "- {name}: {description}");
        }
        let _ = writeln!(text);
        let _ = writeln!(text, "Instructions:");
        let _ = writeln!(
            text,
            "- Work step by step and request one tool call per step. Wait for each result before deciding the next step."
        );
        let _ = writeln!(
            text,
            "- To run a command inside a directory you just created, pass it as working_directory on run_command. Do not chain `cd <dir> && ...`."
        );
        let _ = writeln!(
            text,
            "- If a tool fails, read the error and adjust instead of repeating the same call."
        );
        let _ = write!(
            text,
            "- When the goal is complete, or you need input from the user, reply with text only."
        );
        text
    }
}

/// History plus the planning turn, for the wire only. The session is not touched.
///
/// The planning turn goes immediately before the most recent user turn, or
/// first when the history has no user turn.
pub fn build_context(
    state: &SessionState,
    user_input: &str,
    context: &PlanningContext,
) -> Vec<ConversationTurn> {
    let injected = ConversationTurn::user_text(context.render(user_input));
    let mut turns = Vec::with_capacity(state.history.len() + 1);

    let position = state
        .history
        .iter()
        .rposition(|turn| turn.role == TurnRole::User)
        .unwrap_or(0);

    turns.extend(state.history[..position].iter().cloned());
    turns.push(injected);
    turns.extend(state.history[position..].iter().cloned());
    turns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolOutcome;

    fn context() -> PlanningContext {
        PlanningContext::new("/work", vec![("read_file", "Reads a file.")])
    }

    fn state(history: Vec<ConversationTurn>) -> SessionState {
        SessionState {
            current_model: "gemini-2.5-flash".into(),
            history,
        }
    }

    #[test]
    fn rendered_context_names_goal_directory_and_tools() {
        let text = context().render("list files");
        assert!(text.contains("Working directory: /work"));
        assert!(text.contains("User goal: list files"));
        assert!(text.contains("- read_file: Reads a file."));
        assert!(text.contains("working_directory"));
    }

    #[test]
    fn splices_before_latest_user_turn() {
        let session = state(vec![
            ConversationTurn::user_text("first"),
            ConversationTurn::model_text("ok"),
            ConversationTurn::user_text("second"),
            ConversationTurn::model_call("read_file", Default::default()),
            ConversationTurn::tool_result("read_file", ToolOutcome::success("x")),
        ]);
        let turns = build_context(&session, "second", &context());

        assert_eq!(turns.len(), 6);
        assert_eq!(turns[2].role, TurnRole::User);
        assert!(turns[2].text().unwrap_or_default().contains("User goal: second"));
        assert_eq!(turns[3], session.history[2]);
        assert_eq!(session.history.len(), 5);
    }

    #[test]
    fn prepends_when_no_user_turn_exists() {
        let session = state(vec![ConversationTurn::model_text("hello")]);
        let turns = build_context(&session, "goal", &context());
        assert_eq!(turns.len(), 2);
        assert!(turns[0].text().unwrap_or_default().contains("goal"));
        assert_eq!(turns[1], session.history[0]);

        let turns = build_context(&state(Vec::new()), "goal", &context());
        assert_eq!(turns.len(), 1);
    }
}
