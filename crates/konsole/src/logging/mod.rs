//! Log formatting and dispatch.
//!
//! - [`KonsoleFormatter`] turns a [`LogRecord`] into styled text
//! - [`Konsole`](crate::Konsole) is the `log` backend ([`init`] installs it)
//! - [`Logger`] attaches details and exceptions to `log` records
//! - [`KonsoleLayer`] feeds `tracing` events to the same formatter
//!
//! # Example
//!
//! ```
//! use konsole::{Detail, KonsoleFormatter, LogRecord, Severity};
//!
//! let formatter = KonsoleFormatter::new(false);
//! let record = LogRecord::new(Severity::Error, "bad!").with_detail(Detail::from("broken!"));
//! assert_eq!(formatter.format(&record), "[ERROR] bad!\n    broken!");
//! ```

mod backend;
mod formatter;
mod logger;
mod subscriber;

pub use backend::{DETAIL_KEY, EXCEPTION_KEY, SEVERITY_KEY, init, try_init};
pub use formatter::{KonsoleFormatter, LogRecord, PUNCTUATION};
pub use logger::{
    EXTRA_KEY, Extra, Logger, MAIN_LOGGER, critical, debug, error, info, log, logger, logger_named,
    warning,
};
pub use subscriber::{KonsoleLayer, KonsoleSubscriberBuilder};
