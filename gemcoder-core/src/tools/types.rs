//! Tool identifiers, typed arguments and the uniform outcome shape

use crate::config::constants::tools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Result of every tool execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolOutcome {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.into()),
        }
    }

    /// Failure that still carries captured output (e.g. stdout of a failed command)
    pub fn failure_with_output(error: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: Some(output.into()),
            error: Some(error.into()),
        }
    }
}

/// Closed set of tools the model may call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    RunCommand,
    CreateFile,
    CreateDirectory,
    ReadFile,
    UpdateFile,
    DeleteFile,
}

impl ToolName {
    pub const ALL: [ToolName; 6] = [
        ToolName::RunCommand,
        ToolName::CreateFile,
        ToolName::CreateDirectory,
        ToolName::ReadFile,
        ToolName::UpdateFile,
        ToolName::DeleteFile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RunCommand => tools::RUN_COMMAND,
            Self::CreateFile => tools::CREATE_FILE,
            Self::CreateDirectory => tools::CREATE_DIRECTORY,
            Self::ReadFile => tools::READ_FILE,
            Self::UpdateFile => tools::UPDATE_FILE,
            Self::DeleteFile => tools::DELETE_FILE,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a registered tool
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for ToolName {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolArgumentError {
    #[error("missing required argument '{argument}' for {tool}")]
    Missing { tool: ToolName, argument: &'static str },
    #[error("argument '{argument}' for {tool} must be {expected}")]
    WrongType {
        tool: ToolName,
        argument: &'static str,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommandArgs {
    pub command: String,
    pub working_directory: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathArgs {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteArgs {
    pub path: String,
    pub content: String,
}

/// A validated tool request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    RunCommand(RunCommandArgs),
    CreateFile(WriteArgs),
    CreateDirectory(PathArgs),
    ReadFile(PathArgs),
    UpdateFile(WriteArgs),
    DeleteFile(PathArgs),
}

impl ToolInvocation {
    /// Validate the model-supplied argument bag for `tool`
    pub fn parse(tool: ToolName, args: &Map<String, Value>) -> Result<Self, ToolArgumentError> {
        let reader = ArgReader { tool, args };
        Ok(match tool {
            ToolName::RunCommand => ToolInvocation::RunCommand(RunCommandArgs {
                command: reader.required_str("command")?,
                working_directory: reader.optional_str("working_directory")?,
            }),
            ToolName::CreateFile => ToolInvocation::CreateFile(WriteArgs {
                path: reader.required_str("path")?,
                content: reader.content()?,
            }),
            ToolName::CreateDirectory => ToolInvocation::CreateDirectory(PathArgs {
                path: reader.required_str("path")?,
            }),
            ToolName::ReadFile => ToolInvocation::ReadFile(PathArgs {
                path: reader.required_str("path")?,
            }),
            ToolName::UpdateFile => ToolInvocation::UpdateFile(WriteArgs {
                path: reader.required_str("path")?,
                content: reader.content()?,
            }),
            ToolName::DeleteFile => ToolInvocation::DeleteFile(PathArgs {
                path: reader.required_str("path")?,
            }),
        })
    }

    pub fn tool(&self) -> ToolName {
        match self {
            Self::RunCommand(_) => ToolName::RunCommand,
            Self::CreateFile(_) => ToolName::CreateFile,
            Self::CreateDirectory(_) => ToolName::CreateDirectory,
            Self::ReadFile(_) => ToolName::ReadFile,
            Self::UpdateFile(_) => ToolName::UpdateFile,
            Self::DeleteFile(_) => ToolName::DeleteFile,
        }
    }
}

struct ArgReader<'a> {
    tool: ToolName,
    args: &'a Map<String, Value>,
}

impl ArgReader<'_> {
    fn required_str(&self, argument: &'static str) -> Result<String, ToolArgumentError> {
        match self.optional_str(argument)? {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ToolArgumentError::Missing {
                tool: self.tool,
                argument,
            }),
        }
    }

    fn optional_str(&self, argument: &'static str) -> Result<Option<String>, ToolArgumentError> {
        match self.args.get(argument) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(ToolArgumentError::WrongType {
                tool: self.tool,
                argument,
                expected: "a string",
            }),
        }
    }

    /// File content may legitimately be empty, but must be present
    fn content(&self) -> Result<String, ToolArgumentError> {
        self.optional_str("content")?
            .ok_or(ToolArgumentError::Missing {
                tool: self.tool,
                argument: "content",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn tool_names_round_trip_through_strings() {
        for name in ToolName::ALL {
            assert_eq!(name.as_str().parse::<ToolName>(), Ok(name));
        }
        assert_eq!(
            "format_disk".parse::<ToolName>(),
            Err(UnknownTool("format_disk".into()))
        );
    }

    #[test]
    fn parses_command_with_optional_working_directory() {
        let invocation = ToolInvocation::parse(
            ToolName::RunCommand,
            &args(json!({"command": "cargo init", "working_directory": "app"})),
        )
        .unwrap();
        assert_eq!(
            invocation,
            ToolInvocation::RunCommand(RunCommandArgs {
                command: "cargo init".into(),
                working_directory: Some("app".into()),
            })
        );
    }

    #[test]
    fn missing_required_arguments_are_reported() {
        let err = ToolInvocation::parse(ToolName::DeleteFile, &Map::new()).unwrap_err();
        assert_eq!(
            err,
            ToolArgumentError::Missing {
                tool: ToolName::DeleteFile,
                argument: "path"
            }
        );

        let err =
            ToolInvocation::parse(ToolName::CreateFile, &args(json!({"path": "a.txt"})))
                .unwrap_err();
        assert!(err.to_string().contains("content"));
    }

    #[test]
    fn empty_content_is_allowed_but_wrong_types_are_not() {
        let ok = ToolInvocation::parse(
            ToolName::CreateFile,
            &args(json!({"path": "empty.txt", "content": ""})),
        );
        assert!(ok.is_ok());

        let err = ToolInvocation::parse(ToolName::ReadFile, &args(json!({"path": 42})))
            .unwrap_err();
        assert!(matches!(err, ToolArgumentError::WrongType { .. }));
    }

    #[test]
    fn outcome_serializes_without_absent_fields() {
        let value = serde_json::to_value(ToolOutcome::success("done")).unwrap();
        assert_eq!(value, json!({"success": true, "output": "done"}));
    }
}
