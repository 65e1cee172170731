//! Named styles for the parts of a log entry.
//!
//! A [`StyleRegistry`] maps each [`StyleRole`] to at most one [`StyleSpec`],
//! a pair of escape directives that switch a style on and off again. The
//! directives are opaque: the registry never looks inside them and never
//! nests one style inside another.

use crate::severity::Severity;

/// The part of a log entry a style applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleRole {
    /// The `[LEVEL]` label, styled per severity
    Label(Severity),
    /// The primary message
    Message,
    /// The indented detail block
    Detail,
    /// The indented exception block
    Exception,
}

/// A pair of directives enabling and disabling a style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSpec {
    enable: String,
    disable: String,
}

impl StyleSpec {
    /// Create a spec from verbatim directives.
    #[must_use]
    pub fn new(enable: impl Into<String>, disable: impl Into<String>) -> Self {
        Self {
            enable: enable.into(),
            disable: disable.into(),
        }
    }

    /// Create a spec from Select Graphic Rendition parameters, e.g. `"1;31"`.
    #[must_use]
    pub fn sgr(on: &str, off: &str) -> Self {
        Self::new(format!("\x1b[{on}m"), format!("\x1b[{off}m"))
    }

    /// The directive emitted before the text.
    #[must_use]
    pub fn enable(&self) -> &str {
        &self.enable
    }

    /// The directive emitted after the text.
    #[must_use]
    pub fn disable(&self) -> &str {
        &self.disable
    }

    /// Wrap text in this style.
    #[must_use]
    pub fn paint(&self, text: &str) -> String {
        let mut out = String::with_capacity(self.enable.len() + text.len() + self.disable.len());
        out.push_str(&self.enable);
        out.push_str(text);
        out.push_str(&self.disable);
        out
    }
}

/// Fixed mapping from roles to styles.
///
/// Registries are assembled once and then only read.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    labels: [Option<StyleSpec>; 5],
    message: Option<StyleSpec>,
    detail: Option<StyleSpec>,
    exception: Option<StyleSpec>,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::plain()
            .with(StyleRole::Label(Severity::Critical), StyleSpec::sgr("1;35", "0;39"))
            .with(StyleRole::Label(Severity::Error), StyleSpec::sgr("1;31", "0;39"))
            .with(StyleRole::Label(Severity::Warning), StyleSpec::sgr("1;38;5;208", "0;39"))
            .with(StyleRole::Label(Severity::Info), StyleSpec::sgr("1", "0"))
            .with(StyleRole::Message, StyleSpec::sgr("1", "0"))
            .with(StyleRole::Detail, StyleSpec::sgr("90", "0"))
            .with(StyleRole::Exception, StyleSpec::sgr("90", "0"))
    }
}

impl StyleRegistry {
    /// A registry without any styles.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            labels: Default::default(),
            message: None,
            detail: None,
            exception: None,
        }
    }

    /// Map a role to a style, replacing any previous mapping.
    #[must_use]
    pub fn with(mut self, role: StyleRole, spec: StyleSpec) -> Self {
        *self.slot_mut(role) = Some(spec);
        self
    }

    /// Remove the style for a role.
    #[must_use]
    pub fn without(mut self, role: StyleRole) -> Self {
        *self.slot_mut(role) = None;
        self
    }

    /// Look up the style for a role.
    #[must_use]
    pub fn style_for(&self, role: StyleRole) -> Option<&StyleSpec> {
        match role {
            StyleRole::Label(severity) => self.labels[severity as usize].as_ref(),
            StyleRole::Message => self.message.as_ref(),
            StyleRole::Detail => self.detail.as_ref(),
            StyleRole::Exception => self.exception.as_ref(),
        }
    }

    /// Style text for a role, if the role has a style and color is on.
    #[must_use]
    pub fn apply(&self, role: StyleRole, text: &str, color: bool) -> String {
        match self.style_for(role) {
            Some(spec) if color => spec.paint(text),
            _ => text.to_string(),
        }
    }

    fn slot_mut(&mut self, role: StyleRole) -> &mut Option<StyleSpec> {
        match role {
            StyleRole::Label(severity) => &mut self.labels[severity as usize],
            StyleRole::Message => &mut self.message,
            StyleRole::Detail => &mut self.detail,
            StyleRole::Exception => &mut self.exception,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sgr_directives() {
        let spec = StyleSpec::sgr("1;31", "0;39");
        assert_eq!(spec.enable(), "\x1b[1;31m");
        assert_eq!(spec.disable(), "\x1b[0;39m");
        assert_eq!(spec.paint("x"), "\x1b[1;31mx\x1b[0;39m");
    }

    #[test]
    fn test_apply_with_color() {
        let styles = StyleRegistry::default();
        assert_eq!(
            styles.apply(StyleRole::Label(Severity::Info), "[INFO]", true),
            "\x1b[1m[INFO]\x1b[0m"
        );
    }

    #[test]
    fn test_apply_without_color() {
        let styles = StyleRegistry::default();
        assert_eq!(styles.apply(StyleRole::Message, "fyi.", false), "fyi.");
    }

    #[test]
    fn test_debug_label_is_unstyled() {
        let styles = StyleRegistry::default();
        assert!(styles.style_for(StyleRole::Label(Severity::Debug)).is_none());
        assert_eq!(
            styles.apply(StyleRole::Label(Severity::Debug), "[DEBUG]", true),
            "[DEBUG]"
        );
    }

    #[test]
    fn test_directives_are_emitted_verbatim() {
        let styles = StyleRegistry::plain().with(StyleRole::Detail, StyleSpec::new("<", ">"));
        assert_eq!(styles.apply(StyleRole::Detail, "x", true), "<x>");
    }

    #[test]
    fn test_without_removes_role() {
        let styles = StyleRegistry::default().without(StyleRole::Message);
        assert!(styles.style_for(StyleRole::Message).is_none());
        assert!(styles.style_for(StyleRole::Detail).is_some());
    }

    #[test]
    fn test_plain_registry_is_empty() {
        let styles = StyleRegistry::plain();
        for severity in Severity::ALL {
            assert!(styles.style_for(StyleRole::Label(severity)).is_none());
        }
        assert!(styles.style_for(StyleRole::Exception).is_none());
    }
}
