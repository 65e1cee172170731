//! Application loggers with detail attachment.
//!
//! A [`Logger`] wraps the `log` dispatch engine: it builds ordinary
//! [`log::Record`]s and hands them to the installed backend, adding the
//! detail, exception and severity as reserved key-values. Its calls therefore
//! mix freely with plain `log` macros.
//!
//! # Usage
//!
//! ```ignore
//! use konsole::{Detail, Extra, Severity};
//!
//! konsole::init();
//! let logger = konsole::logger();
//! logger.info(format_args!("fyi"));
//! logger.log_detail(Severity::Error, format_args!("bad!"), "broken!");
//! logger.log_with(
//!     Severity::Warning,
//!     format_args!("retrying"),
//!     Extra::new().detail(Detail::mapping([("attempt", 2)])),
//! )?;
//! ```

use std::error::Error;
use std::fmt;
use std::sync::OnceLock;

use log::kv::Value;
use log::{Log, Metadata, Record};
use serde_json::Map;

use super::backend::{DETAIL_KEY, EXCEPTION_KEY, SEVERITY_KEY};
use crate::detail::Detail;
use crate::error::{KonsoleError, Result};
use crate::severity::Severity;

type Fields = Map<String, serde_json::Value>;

/// Name of the application logger returned by [`logger`].
pub const MAIN_LOGGER: &str = "main";

/// Key that carries extra fields given as a JSON value other than an object.
pub const EXTRA_KEY: &str = "extra";

/// Everything a log call can carry besides its message.
#[derive(Debug, Default)]
pub struct Extra<'a> {
    fields: Option<serde_json::Value>,
    detail: Option<Detail>,
    exception: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Extra<'a> {
    /// Create an empty attachment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra fields forwarded to the backend.
    ///
    /// An object contributes one key-value per member. Any other value is
    /// forwarded whole under [`EXTRA_KEY`], unless a detail is attached.
    #[must_use]
    pub fn fields(mut self, fields: serde_json::Value) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Detail rendered below the message.
    #[must_use]
    pub fn detail(mut self, detail: impl Into<Detail>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Error rendered as the exception block.
    #[must_use]
    pub fn exception(mut self, err: &'a (dyn Error + 'static)) -> Self {
        self.exception = Some(err);
        self
    }

    /// Merge the detail into the extra fields.
    ///
    /// The detail lands under the reserved `detail` key, replacing any value
    /// already there. Fields that are not a JSON object cannot take it.
    fn into_parts(self) -> Result<(Fields, Option<&'a (dyn Error + 'static)>)> {
        let mut fields = match (self.fields, &self.detail) {
            (None | Some(serde_json::Value::Null), _) => Map::new(),
            (Some(serde_json::Value::Object(map)), _) => map,
            (Some(other), Some(_)) => return Err(KonsoleError::ExtraNotMapping(other.to_string())),
            (Some(other), None) => Map::from_iter([(EXTRA_KEY.to_string(), other)]),
        };
        if let Some(detail) = self.detail {
            fields.insert(DETAIL_KEY.to_string(), detail.to_json());
        }
        Ok((fields, self.exception))
    }
}

/// A named logger whose calls can carry a [`Detail`].
#[derive(Clone)]
pub struct Logger {
    name: String,
    dispatch: Option<&'static dyn Log>,
}

impl Logger {
    /// Create a logger dispatching through the global `log` backend.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dispatch: None,
        }
    }

    /// Create a logger dispatching to a specific backend.
    #[must_use]
    pub fn with_dispatch(name: impl Into<String>, dispatch: &'static dyn Log) -> Self {
        Self {
            name: name.into(),
            dispatch: Some(dispatch),
        }
    }

    /// The logger's name, used as the record target.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn dispatch(&self) -> &'static dyn Log {
        self.dispatch.unwrap_or_else(log::logger)
    }

    /// Whether the backend would process a record of this severity.
    #[must_use]
    pub fn is_enabled_for(&self, severity: Severity) -> bool {
        let metadata = Metadata::builder()
            .level(severity.to_level())
            .target(&self.name)
            .build();
        self.dispatch().enabled(&metadata)
    }

    /// Log a critical message.
    pub fn critical(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Critical, args);
    }

    /// Log an error message.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, args);
    }

    /// Log a warning.
    pub fn warning(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Warning, args);
    }

    /// Log an informational message.
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Info, args);
    }

    /// Log a debug message.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Debug, args);
    }

    /// Log a message at the given severity.
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        self.dispatch_record(severity, args, &Map::new(), None);
    }

    /// Log a message with a detail attached.
    pub fn log_detail(
        &self,
        severity: Severity,
        args: fmt::Arguments<'_>,
        detail: impl Into<Detail>,
    ) {
        let mut fields = Map::new();
        fields.insert(DETAIL_KEY.to_string(), detail.into().to_json());
        self.dispatch_record(severity, args, &fields, None);
    }

    /// Log a message with extra fields, detail and exception.
    ///
    /// Fails without logging when a detail is attached to extra fields that
    /// are not a JSON object.
    pub fn log_with(
        &self,
        severity: Severity,
        args: fmt::Arguments<'_>,
        extra: Extra<'_>,
    ) -> Result<()> {
        let (fields, exception) = extra.into_parts()?;
        self.dispatch_record(severity, args, &fields, exception);
        Ok(())
    }

    fn dispatch_record(
        &self,
        severity: Severity,
        args: fmt::Arguments<'_>,
        fields: &Fields,
        exception: Option<&(dyn Error + 'static)>,
    ) {
        let dispatch = self.dispatch();
        let metadata = Metadata::builder()
            .level(severity.to_level())
            .target(&self.name)
            .build();
        if !dispatch.enabled(&metadata) {
            return;
        }

        let mut kvs: Vec<(&str, Value<'_>)> = Vec::with_capacity(fields.len() + 2);
        if severity == Severity::Critical {
            kvs.push((SEVERITY_KEY, Value::from(severity.as_str())));
        }
        for (key, value) in fields {
            kvs.push((key.as_str(), Value::from_serde(value)));
        }
        if let Some(err) = exception {
            kvs.push((EXCEPTION_KEY, Value::from_dyn_error(err)));
        }

        dispatch.log(
            &Record::builder()
                .metadata(metadata)
                .args(args)
                .key_values(&kvs)
                .build(),
        );
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("global", &self.dispatch.is_none())
            .finish()
    }
}

static MAIN: OnceLock<Logger> = OnceLock::new();

/// Get the application logger.
#[must_use]
pub fn logger() -> &'static Logger {
    MAIN.get_or_init(|| Logger::new(MAIN_LOGGER))
}

/// Get a logger with the given name.
#[must_use]
pub fn logger_named(name: impl Into<String>) -> Logger {
    Logger::new(name)
}

/// Log a critical message with the application logger.
pub fn critical(args: fmt::Arguments<'_>) {
    logger().critical(args);
}

/// Log an error message with the application logger.
pub fn error(args: fmt::Arguments<'_>) {
    logger().error(args);
}

/// Log a warning with the application logger.
pub fn warning(args: fmt::Arguments<'_>) {
    logger().warning(args);
}

/// Log an informational message with the application logger.
pub fn info(args: fmt::Arguments<'_>) {
    logger().info(args);
}

/// Log a debug message with the application logger.
pub fn debug(args: fmt::Arguments<'_>) {
    logger().debug(args);
}

/// Log a message at the given severity with the application logger.
pub fn log(severity: Severity, args: fmt::Arguments<'_>) {
    logger().log(severity, args);
}
