use crate::tools::ToolOutcome;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Who contributed a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Model,
    ToolResult,
}

impl TurnRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
            Self::ToolResult => "tool_result",
        }
    }
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function call as requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallPart {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// One piece of a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    Text {
        text: String,
    },
    FunctionCall(FunctionCallPart),
    FunctionResponse {
        name: String,
        result: ToolOutcome,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::FunctionCall(_) => "function_call",
            Self::FunctionResponse { .. } => "function_response",
        }
    }
}

/// Why a turn was refused by the session store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnShapeError {
    #[error("{role} turn has no parts")]
    EmptyParts { role: TurnRole },
    #[error("{role} turn cannot carry a {part} part")]
    InvalidPart { role: TurnRole, part: &'static str },
    #[error("model turn carries {count} function calls; at most one is allowed")]
    MultipleFunctionCalls { count: usize },
}

/// One atomic contribution to the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub parts: Vec<Part>,
}

impl ConversationTurn {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            parts: vec![Part::text(text)],
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            parts: vec![Part::text(text)],
        }
    }

    pub fn model_call(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self {
            role: TurnRole::Model,
            parts: vec![Part::FunctionCall(FunctionCallPart {
                name: name.into(),
                args,
            })],
        }
    }

    pub fn tool_result(name: impl Into<String>, result: ToolOutcome) -> Self {
        Self {
            role: TurnRole::ToolResult,
            parts: vec![Part::FunctionResponse {
                name: name.into(),
                result,
            }],
        }
    }

    /// Check the part shape allowed for the turn's role
    pub fn validate(&self) -> Result<(), TurnShapeError> {
        if self.parts.is_empty() {
            return Err(TurnShapeError::EmptyParts { role: self.role });
        }

        match self.role {
            TurnRole::User => {
                if self.parts.len() != 1 {
                    return Err(TurnShapeError::InvalidPart {
                        role: self.role,
                        part: "additional",
                    });
                }
                self.only_parts_of(&["text"])
            }
            TurnRole::Model => {
                self.only_parts_of(&["text", "function_call"])?;
                let count = self
                    .parts
                    .iter()
                    .filter(|part| matches!(part, Part::FunctionCall(_)))
                    .count();
                if count > 1 {
                    return Err(TurnShapeError::MultipleFunctionCalls { count });
                }
                Ok(())
            }
            TurnRole::ToolResult => {
                if self.parts.len() != 1 {
                    return Err(TurnShapeError::InvalidPart {
                        role: self.role,
                        part: "additional",
                    });
                }
                self.only_parts_of(&["function_response"])
            }
        }
    }

    fn only_parts_of(&self, allowed: &[&str]) -> Result<(), TurnShapeError> {
        match self.parts.iter().find(|part| !allowed.contains(&part.kind())) {
            Some(part) => Err(TurnShapeError::InvalidPart {
                role: self.role,
                part: part.kind(),
            }),
            None => Ok(()),
        }
    }

    /// Concatenated text parts, if any
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self.parts.iter().filter_map(Part::as_text).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }

    pub fn function_call(&self) -> Option<&FunctionCallPart> {
        self.parts.iter().find_map(|part| match part {
            Part::FunctionCall(call) => Some(call),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructors_produce_valid_shapes() {
        let mut args = Map::new();
        args.insert("path".into(), json!("a.txt"));
        assert!(ConversationTurn::user_text("hi").validate().is_ok());
        assert!(ConversationTurn::model_text("ok").validate().is_ok());
        assert!(ConversationTurn::model_call("read_file", args).validate().is_ok());
        assert!(
            ConversationTurn::tool_result("read_file", ToolOutcome::success("x"))
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn rejects_empty_and_mismatched_parts() {
        let empty = ConversationTurn {
            role: TurnRole::Model,
            parts: vec![],
        };
        assert_eq!(
            empty.validate(),
            Err(TurnShapeError::EmptyParts {
                role: TurnRole::Model
            })
        );

        let user_with_call = ConversationTurn {
            role: TurnRole::User,
            parts: vec![Part::FunctionCall(FunctionCallPart {
                name: "x".into(),
                args: Map::new(),
            })],
        };
        assert!(matches!(
            user_with_call.validate(),
            Err(TurnShapeError::InvalidPart {
                part: "function_call",
                ..
            })
        ));

        let tool_with_text = ConversationTurn {
            role: TurnRole::ToolResult,
            parts: vec![Part::text("oops")],
        };
        assert!(tool_with_text.validate().is_err());
    }

    #[test]
    fn model_turn_allows_text_with_one_call() {
        let call = Part::FunctionCall(FunctionCallPart {
            name: "read_file".into(),
            args: Map::new(),
        });
        let ok = ConversationTurn {
            role: TurnRole::Model,
            parts: vec![Part::text("Reading it now"), call.clone()],
        };
        assert!(ok.validate().is_ok());

        let two_calls = ConversationTurn {
            role: TurnRole::Model,
            parts: vec![call.clone(), call],
        };
        assert_eq!(
            two_calls.validate(),
            Err(TurnShapeError::MultipleFunctionCalls { count: 2 })
        );
    }
}
