//! Log severities and the volume shorthand for picking a threshold.

use std::fmt;
use std::str::FromStr;

use crate::error::KonsoleError;

/// The importance of a log event, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Severity {
    /// Diagnostic chatter, hidden by default
    Debug = 0,
    /// Routine progress
    #[default]
    Info = 1,
    /// Something unexpected but recoverable
    Warning = 2,
    /// An operation failed
    Error = 3,
    /// The application cannot continue
    Critical = 4,
}

/// Lowest supported volume.
pub const MIN_VOLUME: i32 = -2;
/// Highest supported volume.
pub const MAX_VOLUME: i32 = 2;

impl Severity {
    /// All severities, least severe first.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// The upper-case name used in rendered labels.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Map a volume to a threshold.
    ///
    /// Zero is the neutral setting (WARNING). Every step up reveals one more
    /// severity, every step down hides one. Volumes outside
    /// [`MIN_VOLUME`]..=[`MAX_VOLUME`] clamp to the nearest bound.
    #[must_use]
    pub fn from_volume(volume: i32) -> Self {
        match volume.clamp(MIN_VOLUME, MAX_VOLUME) {
            -2 => Self::Critical,
            -1 => Self::Error,
            0 => Self::Warning,
            1 => Self::Info,
            _ => Self::Debug,
        }
    }

    /// The `log` level that carries events of this severity.
    ///
    /// `log` has no critical level, so critical events travel as errors and
    /// are told apart by a key-value.
    #[must_use]
    pub fn to_level(self) -> log::Level {
        match self {
            Self::Debug => log::Level::Debug,
            Self::Info => log::Level::Info,
            Self::Warning => log::Level::Warn,
            Self::Error | Self::Critical => log::Level::Error,
        }
    }

    /// The loosest `log` filter that still lets this severity through.
    ///
    /// Trace records render as DEBUG, so a DEBUG threshold admits them too.
    #[must_use]
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Debug => log::LevelFilter::Trace,
            other => other.to_level().to_level_filter(),
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Debug,
            2 => Self::Warning,
            3 => Self::Error,
            4 => Self::Critical,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = KonsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" | "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" | "fatal" => Ok(Self::Critical),
            _ => Err(KonsoleError::InvalidSeverity(s.to_string())),
        }
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warning,
            log::Level::Info => Self::Info,
            log::Level::Debug | log::Level::Trace => Self::Debug,
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warning,
            tracing::Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}
