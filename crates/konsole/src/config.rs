//! Configuration for konsole output.
//!
//! `Config` gathers the handful of switches konsole exposes, supporting both
//! programmatic and environment variable-based configuration. Every field is
//! optional: unset fields leave the current setting alone.

use std::env;

use crate::error::{KonsoleError, Result};
use crate::severity::Severity;

/// Settings applied by [`crate::config()`] and [`crate::Konsole::configure`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Minimum severity to render
    pub level: Option<Severity>,
    /// Force color on or off
    pub color: Option<bool>,
    /// Volume shorthand for the level; takes priority over `level`
    pub volume: Option<i32>,
}

impl Config {
    /// Create an empty config that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables, skipping invalid values.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Values | Description |
    /// |----------|--------|-------------|
    /// | `KONSOLE_LEVEL` | debug/info/warning/error/critical | Minimum severity |
    /// | `KONSOLE_VOLUME` | integer | Volume, wins over `KONSOLE_LEVEL` |
    /// | `KONSOLE_FORCE_COLOR` | (set) | Force color output |
    /// | `KONSOLE_PLAIN` | (set) | Force plain output |
    /// | `NO_COLOR` | (set) | Disable colors (standard) |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    /// Like [`Config::from_env`] but reports unparsable values.
    pub fn try_from_env() -> Result<Self> {
        Self::try_from_lookup(env_lookup)
    }

    /// Read the same variables as [`Config::from_env`] through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            level: lookup(LEVEL_VAR).and_then(|level| level.parse().ok()),
            volume: lookup(VOLUME_VAR).and_then(|volume| volume.trim().parse().ok()),
            color: color_from_lookup(&lookup),
        }
    }

    /// Read the same variables as [`Config::try_from_env`] through `lookup`.
    pub fn try_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(level) = lookup(LEVEL_VAR) {
            config.level = Some(level.parse()?);
        }
        if let Some(volume) = lookup(VOLUME_VAR) {
            config.volume = Some(
                volume
                    .trim()
                    .parse()
                    .map_err(|_| KonsoleError::InvalidVolume(volume.clone()))?,
            );
        }
        config.color = color_from_lookup(&lookup);

        Ok(config)
    }

    // ─────────────────────────────────────────────────
    // Builder Methods
    // ─────────────────────────────────────────────────

    /// Set the minimum severity
    #[must_use]
    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self
    }

    /// Force color on or off
    #[must_use]
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = Some(enabled);
        self
    }

    /// Set the volume
    #[must_use]
    pub fn with_volume(mut self, volume: i32) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Disable color
    #[must_use]
    pub fn plain(self) -> Self {
        self.with_color(false)
    }

    // ─────────────────────────────────────────────────
    // Resolution Methods
    // ─────────────────────────────────────────────────

    /// The threshold this config asks for, if any. Volume wins over level.
    #[must_use]
    pub fn resolve_threshold(&self) -> Option<Severity> {
        self.volume.map(Severity::from_volume).or(self.level)
    }
}

const LEVEL_VAR: &str = "KONSOLE_LEVEL";
const VOLUME_VAR: &str = "KONSOLE_VOLUME";

fn env_lookup(name: &str) -> Option<String> {
    env::var_os(name).map(|value| value.to_string_lossy().into_owned())
}

fn color_from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Option<bool> {
    if crate::detection::DISABLE_COLOR_VARS
        .iter()
        .any(|name| lookup(name).is_some())
    {
        Some(false)
    } else if lookup(crate::detection::FORCE_COLOR_VAR).is_some() {
        Some(true)
    } else {
        None
    }
}
