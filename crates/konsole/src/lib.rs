#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod console;
pub mod detail;
pub mod detection;
mod error;
pub mod exception;
pub mod logging; // Formatter, log backend, Logger, tracing layer
pub mod severity;
pub mod style;
pub mod testing; // Test utilities

pub use config::Config;
pub use console::{Konsole, RedirectGuard, Stream, konsole};
pub use detail::Detail;
pub use error::{KonsoleError, Result};
pub use exception::ExceptionInfo;
pub use logging::{
    DETAIL_KEY, EXCEPTION_KEY, EXTRA_KEY, Extra, KonsoleFormatter, KonsoleLayer, KonsoleSubscriberBuilder,
    LogRecord, Logger, MAIN_LOGGER, PUNCTUATION, SEVERITY_KEY, critical, debug, error, info, init,
    log, logger, logger_named, try_init, warning,
};
pub use severity::Severity;
pub use style::{StyleRegistry, StyleRole, StyleSpec};

/// Apply a configuration to the global konsole.
///
/// Any combination of level, color and volume may be set; a volume takes
/// priority over a level.
pub fn config(config: &Config) {
    konsole().configure(config);
}

/// Redirect the global konsole's output until the guard is dropped.
#[must_use = "output is restored as soon as the guard is dropped"]
pub fn redirect<W: std::io::Write + Send + 'static>(stream: W) -> RedirectGuard<'static> {
    konsole().redirect(stream)
}

/// Log a critical message with the application logger.
///
/// `critical!(detail = expr; "format", args..)` attaches a detail.
#[macro_export]
macro_rules! critical {
    (detail = $detail:expr; $($arg:tt)+) => {
        $crate::logger().log_detail($crate::Severity::Critical, format_args!($($arg)+), $detail)
    };
    ($($arg:tt)+) => {
        $crate::logger().critical(format_args!($($arg)+))
    };
}

/// Log an error message with the application logger.
///
/// `error!(detail = expr; "format", args..)` attaches a detail.
#[macro_export]
macro_rules! error {
    (detail = $detail:expr; $($arg:tt)+) => {
        $crate::logger().log_detail($crate::Severity::Error, format_args!($($arg)+), $detail)
    };
    ($($arg:tt)+) => {
        $crate::logger().error(format_args!($($arg)+))
    };
}

/// Log a warning with the application logger.
///
/// `warning!(detail = expr; "format", args..)` attaches a detail.
#[macro_export]
macro_rules! warning {
    (detail = $detail:expr; $($arg:tt)+) => {
        $crate::logger().log_detail($crate::Severity::Warning, format_args!($($arg)+), $detail)
    };
    ($($arg:tt)+) => {
        $crate::logger().warning(format_args!($($arg)+))
    };
}

/// Log an informational message with the application logger.
///
/// `info!(detail = expr; "format", args..)` attaches a detail.
#[macro_export]
macro_rules! info {
    (detail = $detail:expr; $($arg:tt)+) => {
        $crate::logger().log_detail($crate::Severity::Info, format_args!($($arg)+), $detail)
    };
    ($($arg:tt)+) => {
        $crate::logger().info(format_args!($($arg)+))
    };
}

/// Log a debug message with the application logger.
///
/// `debug!(detail = expr; "format", args..)` attaches a detail.
#[macro_export]
macro_rules! debug {
    (detail = $detail:expr; $($arg:tt)+) => {
        $crate::logger().log_detail($crate::Severity::Debug, format_args!($($arg)+), $detail)
    };
    ($($arg:tt)+) => {
        $crate::logger().debug(format_args!($($arg)+))
    };
}

/// Log a message at a runtime severity with the application logger.
///
/// ```ignore
/// konsole::log!(Severity::Warning, "disk at {}%", 91);
/// konsole::log!(detail = "broken!"; Severity::Error, "bad!");
/// ```
#[macro_export]
macro_rules! log {
    (detail = $detail:expr; $severity:expr, $($arg:tt)+) => {
        $crate::logger().log_detail($severity, format_args!($($arg)+), $detail)
    };
    ($severity:expr, $($arg:tt)+) => {
        $crate::logger().log($severity, format_args!($($arg)+))
    };
}
