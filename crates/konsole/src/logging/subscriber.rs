//! Tracing subscriber integration.
//!
//! Provides a tracing `Layer` and builder that route events through the
//! [`KonsoleFormatter`](super::KonsoleFormatter), so `tracing` macros and
//! `log` macros produce the same lines.
//!
//! Field mapping: `message` is the message, `detail` becomes a scalar
//! detail, `severity` overrides the level (for CRITICAL), `exception` becomes
//! the exception block. Everything else is kept as extra fields.

use std::error::Error;
use std::fmt;

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

use super::LogRecord;
use super::backend::{DETAIL_KEY, EXCEPTION_KEY, SEVERITY_KEY};
use crate::console::Konsole;
use crate::detail::Detail;
use crate::exception::ExceptionInfo;
use crate::severity::Severity;

/// A tracing layer that writes events through a [`Konsole`].
#[derive(Debug, Clone, Copy)]
pub struct KonsoleLayer {
    konsole: &'static Konsole,
}

impl KonsoleLayer {
    /// Create a layer writing through the global konsole.
    #[must_use]
    pub fn new() -> Self {
        Self::with_konsole(crate::console::konsole())
    }

    /// Create a layer writing through a specific konsole.
    #[must_use]
    pub fn with_konsole(konsole: &'static Konsole) -> Self {
        Self { konsole }
    }
}

impl Default for KonsoleLayer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    severity: Option<Severity>,
    detail: Option<Detail>,
    exception: Option<ExceptionInfo>,
    extra: Map<String, Value>,
}

impl FieldCollector {
    fn record_value(&mut self, field: &Field, value: Value) {
        match field.name() {
            "message" => {
                if self.message.is_none() {
                    self.message = Some(text_of(value));
                }
            }
            DETAIL_KEY => self.detail = Some(Detail::Scalar(text_of(value))),
            EXCEPTION_KEY => self.exception = Some(ExceptionInfo::new(text_of(value))),
            SEVERITY_KEY => {
                let name = text_of(value);
                match name.parse() {
                    Ok(severity) => self.severity = Some(severity),
                    Err(_) => {
                        self.extra.insert(SEVERITY_KEY.to_string(), Value::String(name));
                    }
                }
            }
            name => {
                self.extra.insert(name.to_string(), value);
            }
        }
    }
}

fn text_of(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, Value::String(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, Value::String(value.to_string()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, Value::Bool(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        if field.name() == EXCEPTION_KEY {
            self.exception = Some(ExceptionInfo::from_error(value));
        } else {
            self.record_value(field, Value::String(value.to_string()));
        }
    }
}

impl<S> Layer<S> for KonsoleLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        let severity = collector
            .severity
            .unwrap_or_else(|| Severity::from(*metadata.level()));
        let message = collector.message.unwrap_or_default();

        let record = LogRecord {
            severity,
            message,
            detail: collector.detail,
            exception: collector.exception,
            target: metadata.target().to_string(),
            extra: collector.extra,
        };
        // Layers cannot report failures; a broken stream drops the event.
        let _ = self.konsole.emit(&record);
    }
}

/// Builder for configuring a konsole tracing subscriber.
#[derive(Debug)]
pub struct KonsoleSubscriberBuilder {
    konsole: Option<&'static Konsole>,
    level_filter: LevelFilter,
}

impl Default for KonsoleSubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KonsoleSubscriberBuilder {
    /// Create a new builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            konsole: None,
            level_filter: LevelFilter::INFO,
        }
    }

    /// Write through a specific konsole instead of the global one.
    #[must_use]
    pub fn with_konsole(mut self, konsole: &'static Konsole) -> Self {
        self.konsole = Some(konsole);
        self
    }

    /// Set the most verbose level passed to the layer.
    #[must_use]
    pub fn with_level_filter(mut self, filter: LevelFilter) -> Self {
        self.level_filter = filter;
        self
    }

    /// Build the subscriber without installing it.
    #[must_use]
    pub fn build(self) -> impl Subscriber + Send + Sync {
        let layer = match self.konsole {
            Some(konsole) => KonsoleLayer::with_konsole(konsole),
            None => KonsoleLayer::new(),
        };

        tracing_subscriber::registry()
            .with(self.level_filter)
            .with(layer)
    }

    /// Build and install as the global subscriber.
    pub fn init(self) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
        let subscriber = self.build();
        tracing::subscriber::set_global_default(subscriber)
    }
}
