//! Turns a [`LogRecord`] into one styled block of text.
//!
//! The layout is fixed:
//!
//! ```text
//! [LEVEL] message ending in punctuation
//!     detail lines
//!
//!     exception lines
//! ```
//!
//! The label is styled per severity. The message is emphasized only when its
//! label is, so uncolored output and debug messages stay plain.

use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Map, Value};

use crate::detail::{Detail, render_detail};
use crate::exception::{ExceptionInfo, render_exception};
use crate::severity::Severity;
use crate::style::{StyleRegistry, StyleRole};

/// Marks that end a message; messages ending otherwise get one appended.
pub const PUNCTUATION: [char; 8] = ['!', ',', '.', ':', ';', '?', '"', '\''];

const ESC: char = '\x1b';

/// A log event as seen by the formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// How important the event is
    pub severity: Severity,
    /// Fully interpolated message text
    pub message: String,
    /// Optional structured detail
    pub detail: Option<Detail>,
    /// Optional error trace
    pub exception: Option<ExceptionInfo>,
    /// Name of the logger that produced the event
    pub target: String,
    /// Additional fields that are carried along but not rendered
    pub extra: Map<String, Value>,
}

impl LogRecord {
    /// Create a record without detail or exception.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            detail: None,
            exception: None,
            target: String::new(),
            extra: Map::new(),
        }
    }

    /// Attach a detail.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<Detail>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach an error trace.
    #[must_use]
    pub fn with_exception(mut self, exception: impl Into<ExceptionInfo>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    /// Set the originating logger's name.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Carry an extra field.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Formats log records for the console.
///
/// The style registry is fixed when the formatter is built. The color switch
/// can be flipped at any time, including from other threads.
#[derive(Debug)]
pub struct KonsoleFormatter {
    styles: StyleRegistry,
    color: AtomicBool,
}

impl Default for KonsoleFormatter {
    fn default() -> Self {
        Self::new(crate::detection::should_enable_color())
    }
}

impl KonsoleFormatter {
    /// Create a formatter with the default styles.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self::with_styles(StyleRegistry::default(), color)
    }

    /// Create a formatter with custom styles.
    #[must_use]
    pub fn with_styles(styles: StyleRegistry, color: bool) -> Self {
        Self {
            styles,
            color: AtomicBool::new(color),
        }
    }

    /// Whether escape directives are emitted.
    pub fn color(&self) -> bool {
        self.color.load(Ordering::Relaxed)
    }

    /// Turn escape directives on or off for subsequent records.
    pub fn set_color(&self, enabled: bool) {
        self.color.store(enabled, Ordering::Relaxed);
    }

    /// The style registry in use.
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Format a record. The result carries no trailing newline.
    #[must_use]
    pub fn format(&self, record: &LogRecord) -> String {
        let color = self.color();
        let severity = record.severity;

        let label = self.styles.apply(
            StyleRole::Label(severity),
            &format!("[{}]", severity.as_str()),
            color,
        );
        let detail = render_detail(record.detail.as_ref(), &self.styles, color);
        let exception = render_exception(record.exception.as_ref(), &self.styles, color);

        let mut message = record.message.clone();
        if !message.ends_with(PUNCTUATION) {
            message.push(if detail.is_empty() && exception.is_empty() {
                '.'
            } else {
                ':'
            });
        }
        if label.starts_with(ESC) {
            message = self.styles.apply(StyleRole::Message, &message, color);
        }

        let separator = if !detail.is_empty() && !exception.is_empty() {
            "\n"
        } else {
            ""
        };

        let mut out = String::with_capacity(
            label.len() + message.len() + detail.len() + exception.len() + 2,
        );
        out.push_str(&label);
        out.push(' ');
        out.push_str(&message);
        out.push_str(&detail);
        out.push_str(separator);
        out.push_str(&exception);
        out
    }
}
