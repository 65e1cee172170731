//! `log` facade backend.
//!
//! [`Konsole`] implements [`log::Log`], so plain `log` macros render through
//! the same formatter as konsole's own calls. Three key-values are reserved:
//!
//! - `detail`: rendered as the detail block (objects become mappings, arrays
//!   sequences, anything else a scalar)
//! - `exception`: an error captured with `:err`, or any value used as trace
//!   text
//! - `severity`: a severity name, used to carry CRITICAL which `log` lacks
//!
//! All other key-values are kept as extra fields and not rendered.
//!
//! ```ignore
//! konsole::init();
//! log::warn!(detail = 665; "beware!");
//! log::error!(detail:serde = serde_json::json!({"path": "/tmp"}); "open failed");
//! ```

use std::sync::{Mutex, PoisonError};

use log::kv::{self, Key, Value, VisitSource};
use log::{Level, Log, Metadata, Record};
use serde_json::Map;

use super::LogRecord;
use crate::console::{Konsole, konsole};
use crate::detail::Detail;
use crate::error::Result;
use crate::exception::ExceptionInfo;
use crate::severity::Severity;

/// Key-value key carrying the detail attachment.
pub const DETAIL_KEY: &str = "detail";
/// Key-value key carrying the exception.
pub const EXCEPTION_KEY: &str = "exception";
/// Key-value key overriding the severity derived from the level.
pub const SEVERITY_KEY: &str = "severity";

impl Log for Konsole {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Critical records travel as errors, so errors pass whenever a
        // critical record would.
        let ceiling = match metadata.level() {
            Level::Error => Severity::Critical,
            level => Severity::from(level),
        };
        self.is_enabled(ceiling)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // `Log::log` cannot report failures; a broken stream drops the record.
        let _ = self.emit(&LogRecord::from(record));
    }

    fn flush(&self) {
        let _ = Konsole::flush(self);
    }
}

#[derive(Default)]
struct KeyValueCollector {
    severity: Option<Severity>,
    detail: Option<Detail>,
    exception: Option<ExceptionInfo>,
    extra: Map<String, serde_json::Value>,
}

fn to_json(value: &Value<'_>) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()))
}

impl<'kvs> VisitSource<'kvs> for KeyValueCollector {
    fn visit_pair(
        &mut self,
        key: Key<'kvs>,
        value: Value<'kvs>,
    ) -> std::result::Result<(), kv::Error> {
        match key.as_str() {
            SEVERITY_KEY => {
                let name = value.to_string();
                match name.parse() {
                    Ok(severity) => self.severity = Some(severity),
                    Err(_) => {
                        self.extra
                            .insert(SEVERITY_KEY.to_string(), serde_json::Value::String(name));
                    }
                }
            }
            DETAIL_KEY => self.detail = Some(Detail::from(to_json(&value))),
            EXCEPTION_KEY => {
                self.exception = Some(match value.to_borrowed_error() {
                    Some(err) => ExceptionInfo::from_error(err),
                    None => ExceptionInfo::new(value.to_string()),
                });
            }
            other => {
                self.extra.insert(other.to_string(), to_json(&value));
            }
        }
        Ok(())
    }
}

impl From<&Record<'_>> for LogRecord {
    fn from(record: &Record<'_>) -> Self {
        let mut collector = KeyValueCollector::default();
        // The collector never fails, so neither does the visit.
        let _ = record.key_values().visit(&mut collector);

        Self {
            severity: collector
                .severity
                .unwrap_or_else(|| Severity::from(record.level())),
            message: record.args().to_string(),
            detail: collector.detail,
            exception: collector.exception,
            target: record.target().to_string(),
            extra: collector.extra,
        }
    }
}

static INIT: Mutex<()> = Mutex::new(());

/// Install the global konsole as the `log` backend.
///
/// Applies [`crate::Config::from_env`] on first installation. Calling this
/// again once konsole is installed is a no-op.
pub fn try_init() -> Result<&'static Konsole> {
    let _lock = INIT.lock().unwrap_or_else(PoisonError::into_inner);
    let konsole = konsole();
    if konsole.is_installed() {
        return Ok(konsole);
    }

    log::set_logger(konsole)?;
    konsole.mark_installed();
    konsole.configure(&crate::Config::from_env());
    Ok(konsole)
}

/// Install the global konsole as the `log` backend, ignoring a backend that
/// is already installed.
pub fn init() -> &'static Konsole {
    let _ = try_init();
    konsole()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CaptureStream;

    fn record_with<'a>(
        level: Level,
        kvs: &'a dyn kv::Source,
        args: std::fmt::Arguments<'a>,
    ) -> Record<'a> {
        Record::builder()
            .level(level)
            .target("test")
            .args(args)
            .key_values(kvs)
            .build()
    }

    #[test]
    fn test_enabled_follows_threshold() {
        let konsole = Konsole::with_stream(CaptureStream::new(), false);
        let meta = |level| Metadata::builder().level(level).target("test").build();
        assert!(konsole.enabled(&meta(Level::Info)));
        assert!(!konsole.enabled(&meta(Level::Debug)));

        konsole.set_threshold(Severity::Critical);
        assert!(konsole.enabled(&meta(Level::Error)));
        assert!(!konsole.enabled(&meta(Level::Warn)));
    }

    #[test]
    fn test_record_conversion_plain() {
        let kvs: [(&str, Value<'_>); 0] = [];
        let converted = LogRecord::from(&record_with(Level::Warn, &kvs, format_args!("big {}!", "bad")));
        assert_eq!(converted.severity, Severity::Warning);
        assert_eq!(converted.message, "big bad!");
        assert_eq!(converted.target, "test");
        assert!(converted.detail.is_none());
        assert!(converted.exception.is_none());
    }

    #[test]
    fn test_reserved_keys_are_extracted() {
        let kvs = [
            (SEVERITY_KEY, Value::from("critical")),
            (DETAIL_KEY, Value::from("broken!")),
            (EXCEPTION_KEY, Value::from("trace text")),
            ("request_id", Value::from(42_u64)),
        ];
        let converted = LogRecord::from(&record_with(Level::Error, &kvs, format_args!("bad")));
        assert_eq!(converted.severity, Severity::Critical);
        assert_eq!(converted.detail, Some(Detail::from("broken!")));
        assert_eq!(converted.exception, Some(ExceptionInfo::new("trace text")));
        assert_eq!(converted.extra.get("request_id"), Some(&serde_json::json!(42)));
    }

    #[test]
    fn test_structured_detail_becomes_mapping() {
        let detail = serde_json::json!({"path": "/tmp/x", "mode": 420});
        let kvs = [(DETAIL_KEY, Value::from_serde(&detail))];
        let converted = LogRecord::from(&record_with(Level::Info, &kvs, format_args!("open")));
        assert_eq!(
            converted.detail,
            Some(Detail::mapping([("path", "/tmp/x"), ("mode", "420")]))
        );
    }

    #[test]
    fn test_error_value_becomes_exception() {
        let err = std::io::Error::other("disk on fire");
        let kvs = [(EXCEPTION_KEY, Value::from_dyn_error(&err))];
        let converted = LogRecord::from(&record_with(Level::Error, &kvs, format_args!("write failed")));
        assert_eq!(converted.exception, Some(ExceptionInfo::new("disk on fire")));
    }

    #[test]
    fn test_unknown_severity_is_kept_as_extra() {
        let kvs = [(SEVERITY_KEY, Value::from("loud"))];
        let converted = LogRecord::from(&record_with(Level::Warn, &kvs, format_args!("x")));
        assert_eq!(converted.severity, Severity::Warning);
        assert_eq!(converted.extra.get(SEVERITY_KEY), Some(&serde_json::json!("loud")));
    }

    #[test]
    fn test_log_writes_formatted_line() {
        let capture = CaptureStream::new();
        let konsole = Konsole::with_stream(capture.clone(), false);
        let kvs = [(DETAIL_KEY, Value::from("one\ntwo"))];
        konsole.log(&record_with(Level::Info, &kvs, format_args!("look")));
        konsole.log(&record_with(Level::Debug, &kvs, format_args!("hidden")));
        assert_eq!(capture.output(), vec!["[INFO] look:", "    one", "    two"]);
    }

    #[test]
    fn test_critical_below_threshold_is_dropped() {
        let capture = CaptureStream::new();
        let konsole = Konsole::with_stream(capture.clone(), false);
        konsole.set_threshold(Severity::Critical);
        let plain: [(&str, Value<'_>); 0] = [];
        konsole.log(&record_with(Level::Error, &plain, format_args!("error")));
        let critical = [(SEVERITY_KEY, Value::from("CRITICAL"))];
        konsole.log(&record_with(Level::Error, &critical, format_args!("critical")));
        assert_eq!(capture.output(), vec!["[CRITICAL] critical."]);
    }
}
