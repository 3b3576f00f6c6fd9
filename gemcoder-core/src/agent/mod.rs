//! Agent runtime: planning context and the tool-call loop

pub mod context;
pub mod tool_loop;

pub use context::{PlanningContext, build_context};
pub use tool_loop::{
    LoopExit, LoopObserver, LoopReport, NoopObserver, ToolCallLoop, USER_CANCELLED, run_guarded,
};
