//! Confirmation gate
//!
//! Decides which tool calls run straight away, which need an interactive
//! yes/no from the user, and which are refused outright. The table starts
//! from built-in defaults and can be overridden from `[tools.policies]`.

use crate::tools::types::ToolName;
use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Tool execution policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolPolicy {
    /// Run without prompting
    Allow,
    /// Ask the user each time
    #[default]
    Prompt,
    /// Never run
    Deny,
}

/// What the gate decided for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Approve,
    AskUser,
    Refuse,
}

/// Asks the user whether a pending action may proceed
pub trait Confirmer {
    /// `summary` is the one-line description from [`describe_action`].
    fn confirm(&self, tool: ToolName, summary: &str) -> Result<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationGate {
    policies: IndexMap<ToolName, ToolPolicy>,
    auto_approve: bool,
}

impl Default for ConfirmationGate {
    fn default() -> Self {
        let policies = ToolName::ALL
            .into_iter()
            .map(|tool| (tool, default_policy(tool)))
            .collect();
        Self {
            policies,
            auto_approve: false,
        }
    }
}

fn default_policy(tool: ToolName) -> ToolPolicy {
    match tool {
        ToolName::RunCommand | ToolName::UpdateFile | ToolName::DeleteFile => ToolPolicy::Prompt,
        ToolName::CreateFile | ToolName::CreateDirectory | ToolName::ReadFile => {
            ToolPolicy::Allow
        }
    }
}

impl ConfirmationGate {
    /// Apply `[tools.policies]` entries on top of the defaults. Unknown names are ignored.
    pub fn with_overrides(mut self, overrides: &IndexMap<String, ToolPolicy>) -> Self {
        for (name, policy) in overrides {
            match name.parse::<ToolName>() {
                Ok(tool) => {
                    self.policies.insert(tool, *policy);
                }
                Err(err) => warn!(%err, "ignoring policy override"),
            }
        }
        self
    }

    /// Treat `Prompt` entries as approved (the `--yes` flag)
    pub fn with_auto_approve(mut self, auto_approve: bool) -> Self {
        self.auto_approve = auto_approve;
        self
    }

    pub fn auto_approve(&self) -> bool {
        self.auto_approve
    }

    pub fn policy(&self, tool: ToolName) -> ToolPolicy {
        self.policies.get(&tool).copied().unwrap_or_default()
    }

    pub fn policies(&self) -> impl Iterator<Item = (ToolName, ToolPolicy)> + '_ {
        self.policies.iter().map(|(tool, policy)| (*tool, *policy))
    }

    /// Whether the configured table marks `tool_name` as needing approval.
    /// Names outside the registry are not classified here.
    pub fn requires_confirmation(&self, tool_name: &str) -> bool {
        tool_name
            .parse::<ToolName>()
            .map(|tool| self.policy(tool) == ToolPolicy::Prompt)
            .unwrap_or(false)
    }

    pub fn decide(&self, tool: ToolName) -> GateDecision {
        match self.policy(tool) {
            ToolPolicy::Allow => GateDecision::Approve,
            ToolPolicy::Prompt if self.auto_approve => GateDecision::Approve,
            ToolPolicy::Prompt => GateDecision::AskUser,
            ToolPolicy::Deny => GateDecision::Refuse,
        }
    }
}

/// One-line summary of a pending tool call, shown before the yes/no prompt
pub fn describe_action(tool_name: &str, args: &Map<String, Value>) -> String {
    let text = |key: &str| args.get(key).and_then(Value::as_str);

    match tool_name.parse::<ToolName>() {
        Ok(ToolName::RunCommand) => {
            if let Some(command) = text("command") {
                return match text("working_directory") {
                    Some(dir) if !dir.trim().is_empty() => {
                        format!("Run command: {command} (in {dir})")
                    }
                    _ => format!("Run command: {command}"),
                };
            }
        }
        Ok(tool) => {
            if let Some(path) = text("path") {
                let verb = match tool {
                    ToolName::CreateFile => "Create file",
                    ToolName::CreateDirectory => "Create directory",
                    ToolName::ReadFile => "Read file",
                    ToolName::UpdateFile => "Update file",
                    ToolName::DeleteFile => "Delete file",
                    ToolName::RunCommand => "Run",
                };
                return format!("{verb}: {path}");
            }
        }
        Err(_) => {}
    }

    let rendered = serde_json::to_string(args).unwrap_or_else(|_| "{}".to_string());
    format!("{tool_name} {rendered}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn default_table_prompts_for_risky_tools_only() {
        let gate = ConfirmationGate::default();
        assert!(gate.requires_confirmation("run_command"));
        assert!(gate.requires_confirmation("update_file"));
        assert!(gate.requires_confirmation("delete_file"));
        assert!(!gate.requires_confirmation("create_file"));
        assert!(!gate.requires_confirmation("create_directory"));
        assert!(!gate.requires_confirmation("read_file"));
        assert!(!gate.requires_confirmation("unknown"));
    }

    #[test]
    fn overrides_replace_defaults() {
        let mut overrides = IndexMap::new();
        overrides.insert("create_file".to_string(), ToolPolicy::Prompt);
        overrides.insert("delete_file".to_string(), ToolPolicy::Deny);
        overrides.insert("not_a_tool".to_string(), ToolPolicy::Allow);
        let gate = ConfirmationGate::default().with_overrides(&overrides);

        assert_eq!(gate.decide(ToolName::CreateFile), GateDecision::AskUser);
        assert_eq!(gate.decide(ToolName::DeleteFile), GateDecision::Refuse);
        assert_eq!(gate.decide(ToolName::ReadFile), GateDecision::Approve);
    }

    #[test]
    fn auto_approve_skips_prompts_but_not_denials() {
        let mut overrides = IndexMap::new();
        overrides.insert("delete_file".to_string(), ToolPolicy::Deny);
        let gate = ConfirmationGate::default()
            .with_overrides(&overrides)
            .with_auto_approve(true);
        assert_eq!(gate.decide(ToolName::RunCommand), GateDecision::Approve);
        assert_eq!(gate.decide(ToolName::DeleteFile), GateDecision::Refuse);
    }

    #[test]
    fn describes_commands_paths_and_fallback() {
        assert_eq!(
            describe_action(
                "run_command",
                &args(json!({"command": "npm install", "working_directory": "web"}))
            ),
            "Run command: npm install (in web)"
        );
        assert_eq!(
            describe_action("delete_file", &args(json!({"path": "notes.txt"}))),
            "Delete file: notes.txt"
        );
        assert_eq!(
            describe_action("mystery", &args(json!({"a": 1}))),
            r#"mystery {"a":1}"#
        );
    }

    #[test]
    fn policy_names_are_lowercase_in_toml() {
        #[derive(Deserialize)]
        struct Table {
            policies: IndexMap<String, ToolPolicy>,
        }
        let table: Table = toml::from_str("[policies]\nrun_command = \"deny\"\n").unwrap();
        assert_eq!(table.policies["run_command"], ToolPolicy::Deny);
    }
}
