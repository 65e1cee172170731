//! Errors surfaced to callers.

use thiserror::Error;

/// Everything that can go wrong while configuring or driving konsole.
#[derive(Debug, Error)]
pub enum KonsoleError {
    /// A detail was attached while the extra fields held something other
    /// than a JSON object.
    #[error("extra fields must be a mapping but are `{0}`")]
    ExtraNotMapping(String),

    /// A severity name could not be parsed.
    #[error("unknown severity `{0}`")]
    InvalidSeverity(String),

    /// A volume could not be parsed as an integer.
    #[error("invalid volume `{0}`")]
    InvalidVolume(String),

    /// Writing to the output stream failed.
    #[error("failed to write log output: {0}")]
    Io(#[from] std::io::Error),

    /// Another `log` backend was installed first.
    #[error("a global logger is already installed: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KonsoleError>;
