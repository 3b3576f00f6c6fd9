use gemcoder_core::agent::{LoopExit, LoopObserver, LoopReport};
use gemcoder_core::session::FunctionCallPart;
use gemcoder_core::tools::ToolOutcome;
use gemcoder_core::ui::{AnsiRenderer, MessageStyle, Spinner};

const MAX_OUTPUT_LINES: usize = 20;

/// Renders loop progress to the terminal
pub struct TerminalObserver<'a> {
    renderer: &'a mut AnsiRenderer,
    spinner: Option<Spinner>,
}

impl<'a> TerminalObserver<'a> {
    pub fn new(renderer: &'a mut AnsiRenderer) -> Self {
        Self {
            renderer,
            spinner: None,
        }
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl LoopObserver for TerminalObserver<'_> {
    fn on_thinking_started(&mut self) {
        self.spinner = Some(Spinner::new("Thinking..."));
    }

    fn on_thinking_finished(&mut self) {
        self.stop_spinner();
    }

    fn on_model_text(&mut self, text: &str) {
        let _ = self.renderer.block(MessageStyle::Response, text);
    }

    fn on_tool_requested(&mut self, call: &FunctionCallPart, summary: &str) {
        let _ = self
            .renderer
            .line(MessageStyle::Tool, &format!("[{}] {summary}", call.name));
    }

    fn on_tool_result(&mut self, tool: &str, outcome: &ToolOutcome) {
        if let Some(output) = outcome.output.as_deref()
            && !output.trim().is_empty()
        {
            let lines: Vec<&str> = output.lines().collect();
            for line in lines.iter().take(MAX_OUTPUT_LINES) {
                let _ = self.renderer.line(MessageStyle::Output, line);
            }
            if lines.len() > MAX_OUTPUT_LINES {
                let _ = self.renderer.line(
                    MessageStyle::Info,
                    &format!("... {} more lines", lines.len() - MAX_OUTPUT_LINES),
                );
            }
        }
        if !outcome.success {
            let error = outcome.error.as_deref().unwrap_or("failed");
            let _ = self
                .renderer
                .line(MessageStyle::Error, &format!("[{tool}] {error}"));
        }
    }

    fn on_notice(&mut self, message: &str) {
        let _ = self.renderer.line(MessageStyle::Warning, message);
    }

    fn on_exit(&mut self, report: &LoopReport) {
        self.stop_spinner();
        if report.exit != LoopExit::Completed {
            let _ = self.renderer.line(
                MessageStyle::Info,
                &format!("(stopped: {} after {} model calls)", report.exit, report.iterations),
            );
        }
    }
}
