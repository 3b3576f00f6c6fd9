use anstream::{AutoStream, ColorChoice};
use anstyle::{AnsiColor, Color, Reset, Style};
use anstyle_query::{clicolor, clicolor_force, no_color, term_supports_color};
use anyhow::Result;
use std::io::{self, Write};

/// Styles available for rendering transcript lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Info,
    Warning,
    Error,
    /// Tool output
    Output,
    /// Model text
    Response,
    /// Tool requests
    Tool,
    /// Echoed user input and prompts
    User,
}

impl MessageStyle {
    fn style(self) -> Style {
        match self {
            Self::Info => Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))),
            Self::Warning => Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow)))
                .bold(),
            Self::Error => Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Red)))
                .bold(),
            Self::Output => Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))),
            Self::Response => Style::new(),
            Self::Tool => Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Magenta)))
                .bold(),
            Self::User => Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan)))
                .bold(),
        }
    }
}

/// Styled line renderer for the transcript
pub struct AnsiRenderer {
    writer: Box<dyn Write + Send>,
    buffer: String,
    color: bool,
}

impl AnsiRenderer {
    /// Renderer for stdout, honouring NO_COLOR / CLICOLOR
    pub fn stdout() -> Self {
        let color =
            clicolor_force() || (!no_color() && clicolor().unwrap_or_else(term_supports_color));
        let choice = if color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            writer: Box::new(AutoStream::new(io::stdout(), choice)),
            buffer: String::new(),
            color,
        }
    }

    pub fn with_writer(writer: Box<dyn Write + Send>, color: bool) -> Self {
        Self {
            writer,
            buffer: String::new(),
            color,
        }
    }

    pub fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Write the buffer as one styled line and clear it
    pub fn flush(&mut self, style: MessageStyle) -> Result<()> {
        let style = style.style();
        if self.color {
            writeln!(self.writer, "{style}{}{Reset}", self.buffer)?;
        } else {
            writeln!(self.writer, "{}", self.buffer)?;
        }
        self.writer.flush()?;
        self.buffer.clear();
        Ok(())
    }

    pub fn line(&mut self, style: MessageStyle, text: &str) -> Result<()> {
        self.buffer.clear();
        self.push(text);
        self.flush(style)
    }

    /// Multi-line text, one styled line each
    pub fn block(&mut self, style: MessageStyle, text: &str) -> Result<()> {
        for line in text.lines() {
            self.line(style, line)?;
        }
        Ok(())
    }
}
