//! Error traces attached to a log event.

use std::error::Error;
use std::fmt;

use crate::detail::INDENT;
use crate::style::{StyleRegistry, StyleRole};

/// An already-rendered error trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    trace: String,
}

impl ExceptionInfo {
    /// Wrap trace text as is.
    #[must_use]
    pub fn new(trace: impl Into<String>) -> Self {
        Self {
            trace: trace.into(),
        }
    }

    /// Capture an error and the chain of errors that caused it.
    ///
    /// ```
    /// use konsole::exception::ExceptionInfo;
    ///
    /// let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    /// assert_eq!(ExceptionInfo::from_error(&err).trace(), "no such file");
    /// ```
    #[must_use]
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut trace = err.to_string();
        let mut source = err.source();
        if source.is_some() {
            trace.push_str("\n\nCaused by:");
        }
        let mut index = 0;
        while let Some(cause) = source {
            trace.push_str(&format!("\n  {index}: {cause}"));
            index += 1;
            source = cause.source();
        }
        Self { trace }
    }

    /// The trace text.
    #[must_use]
    pub fn trace(&self) -> &str {
        &self.trace
    }
}

impl fmt::Display for ExceptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.trace)
    }
}

impl From<&str> for ExceptionInfo {
    fn from(trace: &str) -> Self {
        Self::new(trace)
    }
}

impl From<String> for ExceptionInfo {
    fn from(trace: String) -> Self {
        Self::new(trace)
    }
}

/// Render an exception as an indented block styled with the exception role.
#[must_use]
pub fn render_exception(
    info: Option<&ExceptionInfo>,
    styles: &StyleRegistry,
    color: bool,
) -> String {
    let Some(info) = info else {
        return String::new();
    };

    let mut block = String::new();
    for line in info.trace.lines() {
        block.push('\n');
        block.push_str(INDENT);
        block.push_str(line);
    }

    if block.is_empty() {
        block
    } else {
        styles.apply(StyleRole::Exception, &block, color)
    }
}
