use crate::tools::types::ToolName;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Name, description and JSON schema advertised to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value, // OpenAPI-ish JSON schema
}

pub(super) fn description_for(tool: ToolName) -> &'static str {
    match tool {
        ToolName::RunCommand => {
            "Runs a shell command and returns its combined output. Use working_directory to run inside a subdirectory (for example one you just created) instead of chaining `cd dir && ...`. A non-zero exit status is reported as a failure."
        }
        ToolName::CreateFile => {
            "Creates a file with the given content, creating parent directories as needed. Overwrites an existing file at the same path."
        }
        ToolName::CreateDirectory => {
            "Creates a directory and any missing parent directories."
        }
        ToolName::ReadFile => "Reads a UTF-8 text file and returns its content.",
        ToolName::UpdateFile => {
            "Replaces the entire content of an existing file. Read the file first when only part of it should change."
        }
        ToolName::DeleteFile => "Deletes a single file.",
    }
}

pub(super) fn parameters_for(tool: ToolName) -> Value {
    match tool {
        ToolName::RunCommand => json!({
            "type": "object",
            "properties": {
                "command": {"type": "string", "description": "Command line to execute. Example: 'cargo test'"},
                "working_directory": {"type": "string", "description": "Directory to run in, relative to the working directory. Default: '.'"}
            },
            "required": ["command"]
        }),
        ToolName::CreateFile | ToolName::UpdateFile => json!({
            "type": "object",
            "properties": {
                "path": {"type": "string", "description": "File path, relative to the working directory or absolute"},
                "content": {"type": "string", "description": "Full file content"}
            },
            "required": ["path", "content"]
        }),
        ToolName::CreateDirectory | ToolName::ReadFile | ToolName::DeleteFile => json!({
            "type": "object",
            "properties": {
                "path": {"type": "string", "description": "Path, relative to the working directory or absolute"}
            },
            "required": ["path"]
        }),
    }
}
