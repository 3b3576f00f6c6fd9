use super::ToolRegistry;
use super::declarations::FunctionDeclaration;
use crate::tools::types::{ToolInvocation, ToolName, ToolOutcome};
use anyhow::Result;
use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt;

pub type ToolExecutorFn =
    for<'a> fn(&'a ToolRegistry, &'a ToolInvocation) -> BoxFuture<'a, Result<ToolOutcome>>;

/// Immutable description of one built-in tool
#[derive(Clone)]
pub struct ToolDescriptor {
    name: ToolName,
    description: &'static str,
    parameters: Value,
    executor: ToolExecutorFn,
}

impl ToolDescriptor {
    pub fn new(
        name: ToolName,
        description: &'static str,
        parameters: Value,
        executor: ToolExecutorFn,
    ) -> Self {
        Self {
            name,
            description,
            parameters,
            executor,
        }
    }

    pub fn name(&self) -> ToolName {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn executor(&self) -> ToolExecutorFn {
        self.executor
    }

    pub fn declaration(&self) -> FunctionDeclaration {
        FunctionDeclaration {
            name: self.name.as_str().to_string(),
            description: self.description.to_string(),
            parameters: self.parameters.clone(),
        }
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
