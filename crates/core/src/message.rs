//! Diagnostic message type shared by the workspace.
//!
//! The CLI never prints through globals; every diagnostic is a [`Message`]
//! rendered into a caller-supplied writer. That keeps the whole front-end
//! testable in-process against byte-vector sinks, and guarantees that the
//! severity prefix and optional exit-code trailer are formatted in exactly
//! one place.
//!
//! Rendered forms:
//!
//! - info: `zeromerge: <text>`
//! - warning: `zeromerge warning: <text>`
//! - error: `zeromerge error: <text> (code N)`

use std::borrow::Cow;
use std::io::{self, Write};

use crate::version::PROGRAM_NAME;

/// Message severity, ordered from least to most severe.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    /// Informational message.
    Info,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
}

/// A user-facing diagnostic with optional exit-code context.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message {
    severity: Severity,
    code: Option<i32>,
    text: Cow<'static, str>,
}

impl Message {
    /// Creates a message with the provided severity and payload.
    #[must_use = "constructed messages must be emitted to reach users"]
    pub fn new<T: Into<Cow<'static, str>>>(severity: Severity, text: T) -> Self {
        Self {
            severity,
            code: None,
            text: text.into(),
        }
    }

    /// Creates an informational message.
    #[must_use = "constructed messages must be emitted to reach users"]
    pub fn info<T: Into<Cow<'static, str>>>(text: T) -> Self {
        Self::new(Severity::Info, text)
    }

    /// Creates a warning message.
    #[must_use = "constructed messages must be emitted to reach users"]
    pub fn warning<T: Into<Cow<'static, str>>>(text: T) -> Self {
        Self::new(Severity::Warning, text)
    }

    /// Creates an error message carrying the exit code it maps to.
    #[must_use = "constructed messages must be emitted to reach users"]
    pub fn error<T: Into<Cow<'static, str>>>(code: i32, text: T) -> Self {
        Self {
            severity: Severity::Error,
            code: Some(code),
            text: text.into(),
        }
    }

    /// Returns the message payload.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the associated exit code, if any.
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        self.code
    }

    /// Returns the message severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Renders the message followed by a newline into `writer`.
    pub fn render_line_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match (self.severity, self.code) {
            (Severity::Error, Some(code)) => {
                writeln!(writer, "{PROGRAM_NAME} error: {} (code {code})", self.text)
            }
            (Severity::Error, None) => {
                writeln!(writer, "{PROGRAM_NAME} error: {}", self.text)
            }
            (Severity::Warning, _) => {
                writeln!(writer, "{PROGRAM_NAME} warning: {}", self.text)
            }
            (Severity::Info, _) => writeln!(writer, "{PROGRAM_NAME}: {}", self.text),
        }
    }
}
