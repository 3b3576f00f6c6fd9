use super::turn::ConversationTurn;
use crate::config::constants::defaults;
use tracing::{debug, warn};

/// Live session state: active model plus retained history
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub current_model: String,
    pub history: Vec<ConversationTurn>,
}

/// Result of an append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    /// Identical to the previous turn of the same role; nothing stored
    Duplicate,
    /// Part shape invalid for the role; nothing stored
    Rejected,
}

/// Owns the conversation for the lifetime of the process.
///
/// Every mutation goes through [`SessionStore::append`], [`SessionStore::set_model`]
/// or [`SessionStore::clear`] and is visible to the next [`SessionStore::current`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: SessionState,
    max_turns: usize,
}

impl SessionStore {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_max_turns(model, defaults::MAX_HISTORY_TURNS)
    }

    pub fn with_max_turns(model: impl Into<String>, max_turns: usize) -> Self {
        Self {
            state: SessionState {
                current_model: model.into(),
                history: Vec::new(),
            },
            max_turns: max_turns.max(1),
        }
    }

    /// Validate, de-duplicate, append, then trim to the newest `max_turns`.
    pub fn append(&mut self, turn: ConversationTurn) -> AppendOutcome {
        if let Err(err) = turn.validate() {
            warn!(role = %turn.role, error = %err, "rejecting malformed turn");
            return AppendOutcome::Rejected;
        }

        // Only the immediately preceding turn is compared.
        if let Some(previous) = self.state.history.last() {
            if previous.role == turn.role && *previous == turn {
                debug!(role = %turn.role, "skipping duplicate turn");
                return AppendOutcome::Duplicate;
            }
        }

        self.state.history.push(turn);

        let len = self.state.history.len();
        if len > self.max_turns {
            let excess = len - self.max_turns;
            self.state.history.drain(..excess);
            debug!(dropped = excess, "trimmed session history");
        }

        AppendOutcome::Appended
    }

    pub fn current(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.state.history
    }

    pub fn model(&self) -> &str {
        &self.state.current_model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.state.current_model = model.into();
    }

    pub fn clear(&mut self) {
        self.state.history.clear();
    }

    pub fn len(&self) -> usize {
        self.state.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.history.is_empty()
    }
}

