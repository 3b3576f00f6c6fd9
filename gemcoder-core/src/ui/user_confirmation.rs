//! Interactive yes/no prompt before risky tool calls

use crate::tool_policy::Confirmer;
use crate::tools::ToolName;
use anyhow::Result;
use console::style;
use dialoguer::Confirm;

/// Terminal confirmer backed by dialoguer. The default answer is "no".
#[derive(Debug, Default, Clone, Copy)]
pub struct UserConfirmation;

impl UserConfirmation {
    pub fn confirm_action(tool: ToolName, summary: &str) -> Result<bool> {
        println!(
            "{} {}",
            style(format!("[{tool}]")).yellow().bold(),
            style(summary).cyan()
        );

        let confirmed = Confirm::new()
            .with_prompt("Allow this action?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", style("Declined").yellow());
        }
        Ok(confirmed)
    }
}

impl Confirmer for UserConfirmation {
    fn confirm(&self, tool: ToolName, summary: &str) -> Result<bool> {
        Self::confirm_action(tool, summary)
    }
}
