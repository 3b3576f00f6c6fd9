//! Conversation turns and the process-wide session store.

mod store;
mod turn;

pub use store::{AppendOutcome, SessionState, SessionStore};
pub use turn::{ConversationTurn, FunctionCallPart, Part, TurnRole, TurnShapeError};
