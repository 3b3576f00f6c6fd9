//! Shell command execution tool

use super::file_ops::resolve_path;
use super::types::{RunCommandArgs, ToolOutcome};
use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Runs a command line through the platform shell and waits for it to exit.
///
/// There is no timeout: a long-running command blocks the caller until it finishes.
#[derive(Debug, Clone)]
pub struct CommandTool {
    workspace_root: PathBuf,
}

impl CommandTool {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    fn shell_command(command_line: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command_line);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command_line);
            cmd
        }
    }

    pub async fn execute(&self, args: &RunCommandArgs) -> Result<ToolOutcome> {
        let work_dir = match args.working_directory.as_deref() {
            Some(dir) if !dir.trim().is_empty() => resolve_path(&self.workspace_root, dir),
            _ => self.workspace_root.clone(),
        };
        if !work_dir.is_dir() {
            return Err(anyhow!(
                "working directory {} does not exist",
                work_dir.display()
            ));
        }

        debug!(command = args.command.as_str(), cwd = %work_dir.display(), "running command");
        let output = Self::shell_command(&args.command)
            .current_dir(&work_dir)
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to execute command: {}", args.command))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();

        if output.status.success() {
            let text = match (stdout.is_empty(), stderr.is_empty()) {
                (true, true) => "Command completed with no output".to_string(),
                (false, true) => stdout,
                (true, false) => stderr,
                (false, false) => format!("{stdout}\n{stderr}"),
            };
            return Ok(ToolOutcome::success(text));
        }

        let code = output
            .status
            .code()
            .map(|code| code.to_string())
            .unwrap_or_else(|| "signal".to_string());
        let error = if stderr.is_empty() {
            format!("Command exited with status {code}")
        } else {
            format!("Command exited with status {code}: {stderr}")
        };
        if stdout.is_empty() {
            Ok(ToolOutcome::failure(error))
        } else {
            Ok(ToolOutcome::failure_with_output(error, stdout))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(command: &str, working_directory: Option<&str>) -> RunCommandArgs {
        RunCommandArgs {
            command: command.to_string(),
            working_directory: working_directory.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn captures_stdout_on_success() -> Result<()> {
        let dir = TempDir::new()?;
        let tool = CommandTool::new(dir.path().to_path_buf());
        let outcome = tool.execute(&args("echo hello", None)).await?;
        assert!(outcome.success);
        assert_eq!(outcome.output.as_deref(), Some("hello"));
        Ok(())
    }

    #[tokio::test]
    async fn nonzero_exit_is_a_failed_outcome() -> Result<()> {
        let dir = TempDir::new()?;
        let tool = CommandTool::new(dir.path().to_path_buf());
        let outcome = tool
            .execute(&args("echo partial; echo broken >&2; exit 3", None))
            .await?;
        assert!(!outcome.success);
        let error = outcome.error.unwrap_or_default();
        assert!(error.contains("status 3"));
        assert!(error.contains("broken"));
        assert_eq!(outcome.output.as_deref(), Some("partial"));
        Ok(())
    }

    #[tokio::test]
    async fn runs_inside_requested_working_directory() -> Result<()> {
        let dir = TempDir::new()?;
        std::fs::create_dir(dir.path().join("app"))?;
        let tool = CommandTool::new(dir.path().to_path_buf());
        let outcome = tool.execute(&args("touch marker", Some("app"))).await?;
        assert!(outcome.success);
        assert!(dir.path().join("app/marker").exists());
        Ok(())
    }

    #[tokio::test]
    async fn missing_working_directory_is_an_error() -> Result<()> {
        let dir = TempDir::new()?;
        let tool = CommandTool::new(dir.path().to_path_buf());
        assert!(tool.execute(&args("ls", Some("nope"))).await.is_err());
        Ok(())
    }
}
