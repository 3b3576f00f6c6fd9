//! Tool registry: name-keyed descriptors and uniform execution

mod declarations;
mod executors;
mod registration;

pub use declarations::FunctionDeclaration;
pub use registration::{ToolDescriptor, ToolExecutorFn};

use declarations::{description_for, parameters_for};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::command::CommandTool;
use super::file_ops::FileOpsTool;
use super::types::{ToolInvocation, ToolName, ToolOutcome};

/// Fixed catalogue of built-in tools. The set is frozen after construction.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    workspace_root: PathBuf,
    file_ops_tool: FileOpsTool,
    command_tool: CommandTool,
    descriptors: IndexMap<ToolName, ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new(workspace_root: PathBuf) -> Self {
        let mut registry = Self {
            file_ops_tool: FileOpsTool::new(workspace_root.clone()),
            command_tool: CommandTool::new(workspace_root.clone()),
            workspace_root,
            descriptors: IndexMap::new(),
        };
        register_builtin_tools(&mut registry);
        registry
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        let tool = name.parse::<ToolName>().ok()?;
        self.descriptors.get(&tool)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.descriptors.values()
    }

    /// Declarations for every tool, in registration order
    pub fn describe_all(&self) -> Vec<FunctionDeclaration> {
        self.descriptors
            .values()
            .map(ToolDescriptor::declaration)
            .collect()
    }

    /// `(name, description)` pairs for prompt construction
    pub fn catalog(&self) -> Vec<(&'static str, &'static str)> {
        self.descriptors
            .values()
            .map(|descriptor| (descriptor.name().as_str(), descriptor.description()))
            .collect()
    }

    /// Run an already validated invocation. Executor errors become failed outcomes.
    pub async fn execute(&self, invocation: &ToolInvocation) -> ToolOutcome {
        let tool = invocation.tool();
        let Some(descriptor) = self.descriptors.get(&tool) else {
            return ToolOutcome::failure(format!("unknown tool: {tool}"));
        };

        debug!(tool = %tool, "executing tool");
        match (descriptor.executor())(self, invocation).await {
            Ok(outcome) => {
                if !outcome.success {
                    debug!(tool = %tool, error = ?outcome.error, "tool reported failure");
                }
                outcome
            }
            Err(err) => {
                warn!(tool = %tool, error = %err, "tool execution failed");
                ToolOutcome::failure(format!("{err:#}"))
            }
        }
    }

    /// Look up, validate and execute in one step
    pub async fn execute_call(&self, name: &str, args: &Map<String, Value>) -> ToolOutcome {
        let tool = match name.parse::<ToolName>() {
            Ok(tool) => tool,
            Err(err) => return ToolOutcome::failure(err.to_string()),
        };
        match ToolInvocation::parse(tool, args) {
            Ok(invocation) => self.execute(&invocation).await,
            Err(err) => ToolOutcome::failure(err.to_string()),
        }
    }
}

fn register_builtin_tools(registry: &mut ToolRegistry) {
    let entries: [(ToolName, ToolExecutorFn); 6] = [
        (ToolName::RunCommand, ToolRegistry::run_command_executor),
        (ToolName::CreateFile, ToolRegistry::create_file_executor),
        (ToolName::CreateDirectory, ToolRegistry::create_directory_executor),
        (ToolName::ReadFile, ToolRegistry::read_file_executor),
        (ToolName::UpdateFile, ToolRegistry::update_file_executor),
        (ToolName::DeleteFile, ToolRegistry::delete_file_executor),
    ];

    for (name, executor) in entries {
        registry.descriptors.insert(
            name,
            ToolDescriptor::new(name, description_for(name), parameters_for(name), executor),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::types::PathArgs;
    use anyhow::Result;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn every_tool_is_registered_once_in_order() {
        let registry = ToolRegistry::new(PathBuf::from("."));
        let names: Vec<_> = registry.descriptors().map(|d| d.name()).collect();
        assert_eq!(names, ToolName::ALL.to_vec());
        assert!(registry.has_tool("read_file"));
        assert!(registry.lookup("readFile").is_none());
    }

    #[test]
    fn declarations_carry_object_schemas() {
        let registry = ToolRegistry::new(PathBuf::from("."));
        for declaration in registry.describe_all() {
            assert_eq!(declaration.parameters["type"], "object");
            assert!(declaration.parameters["required"].is_array());
            assert!(!declaration.description.is_empty());
        }
    }

    #[tokio::test]
    async fn executor_errors_become_failed_outcomes() -> Result<()> {
        let dir = TempDir::new()?;
        let registry = ToolRegistry::new(dir.path().to_path_buf());
        let outcome = registry
            .execute(&ToolInvocation::ReadFile(PathArgs {
                path: "absent.txt".into(),
            }))
            .await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap_or_default().contains("absent.txt"));
        Ok(())
    }

    #[tokio::test]
    async fn execute_call_validates_arguments() -> Result<()> {
        let dir = TempDir::new()?;
        let registry = ToolRegistry::new(dir.path().to_path_buf());
        let args = json!({"content": "x"}).as_object().cloned().unwrap_or_default();
        let outcome = registry.execute_call("create_file", &args).await;
        assert!(!outcome.success);
        assert!(!dir.path().join("x").exists());

        let outcome = registry.execute_call("launch_rocket", &Map::new()).await;
        assert_eq!(outcome.error.as_deref(), Some("unknown tool: launch_rocket"));
        Ok(())
    }
}
