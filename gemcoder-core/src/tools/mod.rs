//! Built-in tools the model can call
//!
//! Every tool returns a [`ToolOutcome`] with the same `{success, output, error}`
//! shape so the loop can feed it back to the model unchanged. Failures of the
//! underlying operation never escape as errors; the registry folds them into
//! a failed outcome.

pub mod command;
pub mod file_ops;
pub mod registry;
pub mod types;

pub use command::CommandTool;
pub use file_ops::{FileOpsTool, resolve_path};
pub use registry::{FunctionDeclaration, ToolDescriptor, ToolExecutorFn, ToolRegistry};
pub use types::{
    PathArgs, RunCommandArgs, ToolArgumentError, ToolInvocation, ToolName, ToolOutcome,
    UnknownTool, WriteArgs,
};
