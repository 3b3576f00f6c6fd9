//! The plan → confirm → execute → observe cycle
//!
//! One call to [`ToolCallLoop::run`] resolves one user request that has
//! already been appended to the session. Each iteration makes exactly one
//! model call and resolves at most one tool call; the tool result is in the
//! session before the next model call is made.

use super::context::{PlanningContext, build_context};
use crate::config::constants::defaults;
use crate::llm::{GenerateInput, GenerateOptions, ModelAdapter};
use crate::session::{ConversationTurn, FunctionCallPart, SessionStore, TurnRole};
use crate::tool_policy::{ConfirmationGate, Confirmer, GateDecision, describe_action};
use crate::tools::{ToolInvocation, ToolName, ToolOutcome, ToolRegistry};
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info, warn};

pub const USER_CANCELLED: &str = "User cancelled execution.";

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The model answered without requesting a tool
    Completed,
    AdapterFailed,
    UnknownTool,
    /// The user declined a confirmation prompt
    Cancelled,
    PolicyDenied,
    BudgetExhausted,
}

impl fmt::Display for LoopExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoopExit::Completed => "completed",
            LoopExit::AdapterFailed => "model request failed",
            LoopExit::UnknownTool => "unknown tool",
            LoopExit::Cancelled => "cancelled",
            LoopExit::PolicyDenied => "denied by policy",
            LoopExit::BudgetExhausted => "iteration budget exhausted",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopReport {
    pub exit: LoopExit,
    /// Model calls made for this request
    pub iterations: usize,
}

/// Progress callbacks. All methods default to doing nothing.
#[allow(unused_variables)]
pub trait LoopObserver {
    fn on_thinking_started(&mut self) {}
    fn on_thinking_finished(&mut self) {}
    fn on_model_text(&mut self, text: &str) {}
    fn on_tool_requested(&mut self, call: &FunctionCallPart, summary: &str) {}
    fn on_tool_result(&mut self, tool: &str, outcome: &ToolOutcome) {}
    fn on_notice(&mut self, message: &str) {}
    fn on_exit(&mut self, report: &LoopReport) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl LoopObserver for NoopObserver {}

enum LoopState {
    Planning,
    AwaitingConfirmation(FunctionCallPart),
    Executing {
        name: String,
        invocation: ToolInvocation,
    },
    Done(LoopExit),
}

pub struct ToolCallLoop<'a> {
    adapter: &'a dyn ModelAdapter,
    registry: &'a ToolRegistry,
    gate: &'a ConfirmationGate,
    confirmer: &'a dyn Confirmer,
    context: PlanningContext,
    options: GenerateOptions,
    max_iterations: usize,
}

impl<'a> ToolCallLoop<'a> {
    pub fn new(
        adapter: &'a dyn ModelAdapter,
        registry: &'a ToolRegistry,
        gate: &'a ConfirmationGate,
        confirmer: &'a dyn Confirmer,
    ) -> Self {
        Self {
            adapter,
            registry,
            gate,
            confirmer,
            context: PlanningContext::new(registry.workspace_root(), registry.catalog()),
            options: GenerateOptions::default().with_tools(registry.describe_all()),
            max_iterations: defaults::MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Generation and cache settings. The tool list always comes from the registry.
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options.with_tools(self.registry.describe_all());
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub async fn run(
        &self,
        session: &mut SessionStore,
        observer: &mut dyn LoopObserver,
    ) -> LoopReport {
        let goal = session
            .history()
            .iter()
            .rev()
            .find(|turn| turn.role == TurnRole::User)
            .and_then(ConversationTurn::text)
            .unwrap_or_default();

        let mut iterations = 0;
        let mut state = LoopState::Planning;

        let exit = loop {
            state = match state {
                LoopState::Planning => {
                    if iterations >= self.max_iterations {
                        self.exhaust_budget(session, observer)
                    } else {
                        iterations += 1;
                        self.plan(session, &goal, observer).await
                    }
                }
                LoopState::AwaitingConfirmation(call) => self.confirm(session, call, observer),
                LoopState::Executing { name, invocation } => {
                    self.execute(session, name, invocation, observer).await
                }
                LoopState::Done(exit) => break exit,
            };
        };

        let report = LoopReport { exit, iterations };
        info!(exit = %report.exit, iterations, "tool loop finished");
        observer.on_exit(&report);
        report
    }

    async fn plan(
        &self,
        session: &mut SessionStore,
        goal: &str,
        observer: &mut dyn LoopObserver,
    ) -> LoopState {
        let turns = build_context(session.current(), goal, &self.context);
        let options = self.options.clone().with_model(session.model());

        observer.on_thinking_started();
        let result = self
            .adapter
            .generate(GenerateInput::Conversation(turns), &options)
            .await;
        observer.on_thinking_finished();

        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                error!(adapter = self.adapter.name(), kind = err.kind(), error = %err, "model call failed");
                let message = format!("Model request failed: {err}");
                session.append(ConversationTurn::model_text(message.clone()));
                observer.on_model_text(&message);
                return LoopState::Done(LoopExit::AdapterFailed);
            }
        };

        if let Some(text) = reply.visible_text() {
            session.append(ConversationTurn::model_text(text));
            observer.on_model_text(text);
        }

        match reply.function_call {
            None => {
                debug!(finish_reason = ?reply.finish_reason, "text-only reply");
                LoopState::Done(LoopExit::Completed)
            }
            Some(call) => {
                session.append(ConversationTurn::model_call(
                    call.name.clone(),
                    call.args.clone(),
                ));
                LoopState::AwaitingConfirmation(call)
            }
        }
    }

    fn confirm(
        &self,
        session: &mut SessionStore,
        call: FunctionCallPart,
        observer: &mut dyn LoopObserver,
    ) -> LoopState {
        let tool = match self.registry.lookup(&call.name) {
            Some(descriptor) => descriptor.name(),
            None => {
                warn!(tool = call.name.as_str(), "model requested an unknown tool");
                let outcome = ToolOutcome::failure(format!("unknown tool: {}", call.name));
                self.record_result(session, &call.name, outcome, observer);
                return LoopState::Done(LoopExit::UnknownTool);
            }
        };

        let invocation = match ToolInvocation::parse(tool, &call.args) {
            Ok(invocation) => invocation,
            Err(err) => {
                debug!(tool = %tool, error = %err, "invalid tool arguments");
                self.record_result(session, &call.name, ToolOutcome::failure(err.to_string()), observer);
                return LoopState::Planning;
            }
        };

        let summary = describe_action(&call.name, &call.args);
        observer.on_tool_requested(&call, &summary);

        let approved = match self.gate.decide(tool) {
            GateDecision::Approve => true,
            GateDecision::AskUser => self.ask_user(tool, &summary),
            GateDecision::Refuse => {
                warn!(tool = %tool, "tool denied by policy");
                let outcome =
                    ToolOutcome::failure(format!("Tool '{tool}' is denied by policy."));
                self.record_result(session, &call.name, outcome, observer);
                return LoopState::Done(LoopExit::PolicyDenied);
            }
        };

        if !approved {
            info!(tool = %tool, "user declined tool execution");
            self.record_result(session, &call.name, ToolOutcome::failure(USER_CANCELLED), observer);
            observer.on_notice("Execution cancelled. Send a new request to continue.");
            return LoopState::Done(LoopExit::Cancelled);
        }

        LoopState::Executing {
            name: call.name,
            invocation,
        }
    }

    /// Prompt errors count as a denial
    fn ask_user(&self, tool: ToolName, summary: &str) -> bool {
        match self.confirmer.confirm(tool, summary) {
            Ok(answer) => answer,
            Err(err) => {
                warn!(tool = %tool, error = %err, "confirmation prompt failed");
                false
            }
        }
    }

    async fn execute(
        &self,
        session: &mut SessionStore,
        name: String,
        invocation: ToolInvocation,
        observer: &mut dyn LoopObserver,
    ) -> LoopState {
        let outcome = run_guarded(&name, self.registry.execute(&invocation)).await;

        if !outcome.success {
            warn!(tool = name.as_str(), error = ?outcome.error, "tool failed; returning result to the model");
        }
        self.record_result(session, &name, outcome, observer);
        LoopState::Planning
    }

    fn exhaust_budget(
        &self,
        session: &mut SessionStore,
        observer: &mut dyn LoopObserver,
    ) -> LoopState {
        warn!(max = self.max_iterations, "iteration budget exhausted");
        let message = format!(
            "I reached the limit of {} steps for this request without finishing. Please split the task into smaller requests.",
            self.max_iterations
        );
        session.append(ConversationTurn::model_text(message.clone()));
        observer.on_model_text(&message);
        LoopState::Done(LoopExit::BudgetExhausted)
    }

    fn record_result(
        &self,
        session: &mut SessionStore,
        name: &str,
        outcome: ToolOutcome,
        observer: &mut dyn LoopObserver,
    ) {
        observer.on_tool_result(name, &outcome);
        session.append(ConversationTurn::tool_result(name, outcome));
    }
}

/// Await a tool future, turning a panic into a failed outcome
pub async fn run_guarded<F>(name: &str, execution: F) -> ToolOutcome
where
    F: Future<Output = ToolOutcome>,
{
    match AssertUnwindSafe(execution).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(tool = name, panic = message.as_str(), "tool panicked");
            ToolOutcome::failure(format!("Tool '{name}' crashed: {message}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn panicking_tool_becomes_a_failed_outcome() {
        let outcome = run_guarded("create_file", async {
            if outcome_should_panic() {
                panic!("disk on fire");
            }
            ToolOutcome::success("written")
        })
        .await;
        assert!(!outcome.success);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Tool 'create_file' crashed: disk on fire")
        );
    }

    #[tokio::test]
    async fn formatted_panic_messages_are_kept() {
        let path = "notes.txt";
        let outcome = run_guarded("read_file", async move {
            if outcome_should_panic() {
                panic!("cannot read {path}");
            }
            ToolOutcome::success("contents")
        })
        .await;
        assert_eq!(
            outcome.error.as_deref(),
            Some("Tool 'read_file' crashed: cannot read notes.txt")
        );
    }

    #[tokio::test]
    async fn completed_tools_pass_through() {
        let outcome = run_guarded("read_file", async { ToolOutcome::success("contents") }).await;
        assert_eq!(outcome, ToolOutcome::success("contents"));
    }

    fn outcome_should_panic() -> bool {
        true
    }
}
