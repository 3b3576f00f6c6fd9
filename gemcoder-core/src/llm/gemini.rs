//! Gemini implementation of [`ModelAdapter`]

use super::{AdapterError, GenerateInput, GenerateOptions, ModelAdapter, ModelReply};
use crate::config::constants::finish_reasons;
use crate::gemini::{
    Client, Content, FunctionCall, FunctionResponse, GenerateContentRequest,
    GenerateContentResponse, GenerationParams, Part, SafetySetting, Tool, ToolConfig,
};
use crate::session::{self, ConversationTurn, FunctionCallPart, TurnRole};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Sent in place of a turn that would otherwise have no parts
const PLACEHOLDER_TEXT: &str = "(empty)";

pub struct GeminiAdapter {
    client: Client,
    default_model: String,
}

impl GeminiAdapter {
    pub fn new(api_key: String, default_model: impl Into<String>) -> Self {
        Self {
            client: Client::new(api_key),
            default_model: default_model.into(),
        }
    }

    pub fn with_base_url(
        api_key: String,
        base_url: String,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::with_base_url(api_key, base_url),
            default_model: default_model.into(),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

#[async_trait]
impl ModelAdapter for GeminiAdapter {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        input: GenerateInput,
        options: &GenerateOptions,
    ) -> Result<ModelReply, AdapterError> {
        let model = options
            .model
            .as_deref()
            .unwrap_or(self.default_model.as_str());
        let request = build_request(input, options);
        let response = self.client.generate_content(model, &request).await?;
        parse_response(response)
    }
}

/// Map session turns onto Gemini `contents`.
///
/// History trimming can leave a tool result whose function call is gone.
/// Gemini rejects such a request, so leading turns before the first user turn
/// are skipped and any function response that does not answer the call right
/// before it is dropped.
pub fn to_contents(turns: &[ConversationTurn]) -> Vec<Content> {
    let start = turns
        .iter()
        .position(|turn| turn.role == TurnRole::User)
        .unwrap_or(0);
    if start > 0 {
        debug!(dropped = start, "skipping turns before the first user turn");
    }

    let mut contents: Vec<Content> = Vec::with_capacity(turns.len() - start);
    for turn in &turns[start..] {
        if turn.role == TurnRole::ToolResult && !answers_previous_call(turn, contents.last()) {
            warn!("dropping tool result without a matching function call");
            continue;
        }
        contents.push(turn_to_content(turn));
    }
    contents
}

fn answers_previous_call(turn: &ConversationTurn, previous: Option<&Content>) -> bool {
    let Some(previous) = previous else {
        return false;
    };
    previous.role == "model"
        && turn.parts.iter().all(|part| match part {
            session::Part::FunctionResponse { name, .. } => {
                previous.parts.iter().any(|candidate| {
                    matches!(candidate, Part::FunctionCall { function_call } if function_call.name == *name)
                })
            }
            _ => false,
        })
}

fn turn_to_content(turn: &ConversationTurn) -> Content {
    let role = match turn.role {
        TurnRole::Model => "model",
        // Gemini carries function responses on the user role
        TurnRole::User | TurnRole::ToolResult => "user",
    };

    let mut parts: Vec<Part> = turn
        .parts
        .iter()
        .map(|part| match part {
            session::Part::Text { text } => Part::Text { text: text.clone() },
            session::Part::FunctionCall(call) => Part::FunctionCall {
                function_call: FunctionCall {
                    name: call.name.clone(),
                    args: Value::Object(call.args.clone()),
                },
            },
            session::Part::FunctionResponse { name, result } => Part::FunctionResponse {
                function_response: FunctionResponse {
                    name: name.clone(),
                    response: serde_json::to_value(result).unwrap_or(Value::Null),
                },
            },
        })
        .collect();

    if parts.is_empty() {
        parts.push(Part::Text {
            text: PLACEHOLDER_TEXT.to_string(),
        });
    }

    Content {
        role: role.to_string(),
        parts,
    }
}

pub fn build_request(input: GenerateInput, options: &GenerateOptions) -> GenerateContentRequest {
    let contents = match input {
        GenerateInput::Prompt(prompt) => vec![Content::user_text(prompt)],
        GenerateInput::Conversation(turns) => to_contents(&turns),
    };

    let (tools, tool_config) = if options.tools.is_empty() {
        (None, None)
    } else {
        (
            Some(vec![Tool {
                function_declarations: options.tools.clone(),
            }]),
            Some(ToolConfig::auto()),
        )
    };

    let generation = GenerationParams {
        temperature: options.generation.temperature,
        max_output_tokens: options.generation.max_output_tokens,
    };

    GenerateContentRequest {
        contents,
        tools,
        tool_config,
        system_instruction: options
            .system_instruction
            .as_deref()
            .map(Content::system_text),
        generation_config: (!generation.is_empty()).then_some(generation),
        safety_settings: options
            .generation
            .safety_threshold
            .as_deref()
            .map(SafetySetting::uniform),
        cached_content: options.cache.cached_content.clone(),
    }
}

/// Turn a raw response into a [`ModelReply`], surfacing blocks and empty candidate lists
pub fn parse_response(response: GenerateContentResponse) -> Result<ModelReply, AdapterError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.clone())
    {
        return Err(AdapterError::Blocked { reason });
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(AdapterError::NoCandidate);
    };

    let finish_reason = candidate.finish_reason;
    let parts = candidate.content.map(|content| content.parts).unwrap_or_default();

    if parts.is_empty()
        && let Some(reason) = finish_reason.as_deref()
        && finish_reasons::BLOCKED.contains(&reason)
    {
        return Err(AdapterError::Blocked {
            reason: reason.to_string(),
        });
    }

    let mut texts = Vec::new();
    let mut calls = Vec::new();
    for part in parts {
        match part {
            Part::Text { text } => texts.push(text),
            Part::FunctionCall { function_call } => calls.push(function_call),
            Part::FunctionResponse { .. } => {
                debug!("ignoring functionResponse part in model output");
            }
        }
    }

    if calls.len() > 1 {
        warn!(count = calls.len(), "model returned several function calls; keeping the first");
    }
    let function_call = match calls.into_iter().next() {
        Some(call) => Some(FunctionCallPart {
            name: call.name,
            args: into_args(call.args)?,
        }),
        None => None,
    };

    Ok(ModelReply {
        text: (!texts.is_empty()).then(|| texts.concat()),
        function_call,
        finish_reason,
    })
}

fn into_args(value: Value) -> Result<Map<String, Value>, AdapterError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(AdapterError::InvalidResponse(format!(
            "function call arguments must be an object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::tools::ToolOutcome;
    use serde_json::json;

    fn response(value: Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn tool_results_travel_as_user_function_responses() {
        let turns = vec![
            ConversationTurn::user_text("make notes"),
            ConversationTurn::model_call(
                "create_file",
                json!({"path": "notes.txt", "content": "hi"})
                    .as_object()
                    .cloned()
                    .unwrap(),
            ),
            ConversationTurn::tool_result("create_file", ToolOutcome::success("ok")),
        ];
        let contents = to_contents(&turns);
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[2].role, "user");
        let value = serde_json::to_value(&contents[2]).unwrap();
        assert_eq!(
            value["parts"][0]["functionResponse"]["response"],
            json!({"success": true, "output": "ok"})
        );
    }

    #[test]
    fn trimmed_history_never_starts_with_a_function_response() {
        let turns = vec![
            ConversationTurn::tool_result("create_directory", ToolOutcome::success("made a")),
            ConversationTurn::model_text("Next directory."),
            ConversationTurn::model_call("create_directory", Map::new()),
            ConversationTurn::tool_result("create_directory", ToolOutcome::success("made b")),
            ConversationTurn::user_text("now list them"),
        ];
        let contents = to_contents(&turns);
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[0].parts[0].as_text(), Some("now list them"));
    }

    #[test]
    fn orphaned_function_responses_are_dropped_after_the_first_user_turn() {
        let turns = vec![
            ConversationTurn::user_text("planning context"),
            ConversationTurn::tool_result("create_directory", ToolOutcome::success("made a")),
            ConversationTurn::model_call("create_directory", Map::new()),
            ConversationTurn::tool_result("create_directory", ToolOutcome::success("made b")),
            ConversationTurn::model_call("read_file", Map::new()),
            ConversationTurn::tool_result("delete_file", ToolOutcome::failure("mismatched")),
        ];
        let contents = to_contents(&turns);
        let roles: Vec<&str> = contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, ["user", "model", "user", "model"]);
        let value = serde_json::to_value(&contents[2]).unwrap();
        assert_eq!(
            value["parts"][0]["functionResponse"]["response"]["output"],
            "made b"
        );
    }

    #[test]
    fn empty_turns_get_a_placeholder_part() {
        let turn = ConversationTurn {
            role: TurnRole::Model,
            parts: Vec::new(),
        };
        let contents = to_contents(&[turn]);
        assert_eq!(contents[0].parts[0].as_text(), Some(PLACEHOLDER_TEXT));
    }

    #[test]
    fn request_carries_pass_through_options() {
        let options = GenerateOptions {
            generation: GenerationConfig {
                temperature: Some(0.2),
                max_output_tokens: None,
                safety_threshold: Some("BLOCK_ONLY_HIGH".into()),
            },
            system_instruction: Some("be brief".into()),
            ..Default::default()
        };
        let request = build_request(GenerateInput::Prompt("hi".into()), &options);
        assert!(request.tools.is_none());
        assert_eq!(request.generation_config.and_then(|g| g.temperature), Some(0.2));
        let safety = request.safety_settings.unwrap_or_default();
        assert_eq!(safety.len(), 4);
        assert!(safety.iter().all(|s| s.threshold == "BLOCK_ONLY_HIGH"));
        assert_eq!(request.system_instruction.map(|c| c.role), Some("system".into()));
    }

    #[test]
    fn parses_text_and_first_function_call() {
        let reply = parse_response(response(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "Deleting now."},
                    {"functionCall": {"name": "delete_file", "args": {"path": "a"}}},
                    {"functionCall": {"name": "delete_file", "args": {"path": "b"}}}
                ]},
                "finishReason": "STOP"
            }]
        })))
        .unwrap();
        assert_eq!(reply.text.as_deref(), Some("Deleting now."));
        let call = reply.function_call.unwrap();
        assert_eq!(call.name, "delete_file");
        assert_eq!(call.args["path"], "a");
        assert_eq!(reply.finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn empty_text_with_stop_is_a_valid_reply() {
        let reply = parse_response(response(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": ""}]}, "finishReason": "STOP"}]
        })))
        .unwrap();
        assert_eq!(reply.text.as_deref(), Some(""));
        assert!(reply.function_call.is_none());
        assert!(reply.visible_text().is_none());
    }

    #[test]
    fn blocks_and_missing_candidates_are_errors() {
        let err = parse_response(response(json!({"promptFeedback": {"blockReason": "SAFETY"}})))
            .unwrap_err();
        assert!(matches!(err, AdapterError::Blocked { ref reason } if reason == "SAFETY"));

        let err = parse_response(response(json!({"candidates": []}))).unwrap_err();
        assert!(matches!(err, AdapterError::NoCandidate));

        let err = parse_response(response(json!({
            "candidates": [{"finishReason": "RECITATION"}]
        })))
        .unwrap_err();
        assert!(matches!(err, AdapterError::Blocked { .. }));
    }
}
