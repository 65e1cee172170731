//! Terminal detection
//!
//! Decides whether colored output is appropriate when nobody said otherwise.

use std::env;

/// Variables that turn color off when set to anything.
pub const DISABLE_COLOR_VARS: [&str; 2] = ["NO_COLOR", "KONSOLE_PLAIN"];

/// Variable that turns color on when set to anything.
pub const FORCE_COLOR_VAR: &str = "KONSOLE_FORCE_COLOR";

/// Whether the environment explicitly disables color.
#[must_use]
pub fn is_color_disabled() -> bool {
    DISABLE_COLOR_VARS
        .iter()
        .any(|name| env::var_os(name).is_some())
}

/// Whether the environment explicitly forces color.
#[must_use]
pub fn is_color_forced() -> bool {
    env::var_os(FORCE_COLOR_VAR).is_some()
}

/// Determine if colored output should be enabled by default.
///
/// Explicit opt-outs win over explicit opt-ins; without either, color is on
/// exactly when standard error is an interactive terminal.
#[must_use]
pub fn should_enable_color() -> bool {
    if is_color_disabled() {
        return false;
    }
    if is_color_forced() {
        return true;
    }
    console::Term::stderr().is_term()
}
