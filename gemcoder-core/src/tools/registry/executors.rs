use super::ToolRegistry;
use crate::tools::types::{ToolInvocation, ToolOutcome};
use anyhow::{Result, anyhow};
use futures::future::BoxFuture;

fn mismatch(expected: &str, invocation: &ToolInvocation) -> anyhow::Error {
    anyhow!(
        "executor for {} received arguments for {}",
        expected,
        invocation.tool()
    )
}

impl ToolRegistry {
    pub(super) fn run_command_executor<'a>(
        &'a self,
        invocation: &'a ToolInvocation,
    ) -> BoxFuture<'a, Result<ToolOutcome>> {
        Box::pin(async move {
            match invocation {
                ToolInvocation::RunCommand(args) => self.command_tool.execute(args).await,
                other => Err(mismatch("run_command", other)),
            }
        })
    }

    pub(super) fn create_file_executor<'a>(
        &'a self,
        invocation: &'a ToolInvocation,
    ) -> BoxFuture<'a, Result<ToolOutcome>> {
        Box::pin(async move {
            match invocation {
                ToolInvocation::CreateFile(args) => self
                    .file_ops_tool
                    .create_file(args)
                    .await
                    .map(ToolOutcome::success),
                other => Err(mismatch("create_file", other)),
            }
        })
    }

    pub(super) fn create_directory_executor<'a>(
        &'a self,
        invocation: &'a ToolInvocation,
    ) -> BoxFuture<'a, Result<ToolOutcome>> {
        Box::pin(async move {
            match invocation {
                ToolInvocation::CreateDirectory(args) => self
                    .file_ops_tool
                    .create_directory(args)
                    .await
                    .map(ToolOutcome::success),
                other => Err(mismatch("create_directory", other)),
            }
        })
    }

    pub(super) fn read_file_executor<'a>(
        &'a self,
        invocation: &'a ToolInvocation,
    ) -> BoxFuture<'a, Result<ToolOutcome>> {
        Box::pin(async move {
            match invocation {
                ToolInvocation::ReadFile(args) => self
                    .file_ops_tool
                    .read_file(args)
                    .await
                    .map(ToolOutcome::success),
                other => Err(mismatch("read_file", other)),
            }
        })
    }

    pub(super) fn update_file_executor<'a>(
        &'a self,
        invocation: &'a ToolInvocation,
    ) -> BoxFuture<'a, Result<ToolOutcome>> {
        Box::pin(async move {
            match invocation {
                ToolInvocation::UpdateFile(args) => self
                    .file_ops_tool
                    .update_file(args)
                    .await
                    .map(ToolOutcome::success),
                other => Err(mismatch("update_file", other)),
            }
        })
    }

    pub(super) fn delete_file_executor<'a>(
        &'a self,
        invocation: &'a ToolInvocation,
    ) -> BoxFuture<'a, Result<ToolOutcome>> {
        Box::pin(async move {
            match invocation {
                ToolInvocation::DeleteFile(args) => self
                    .file_ops_tool
                    .delete_file(args)
                    .await
                    .map(ToolOutcome::success),
                other => Err(mismatch("delete_file", other)),
            }
        })
    }
}
