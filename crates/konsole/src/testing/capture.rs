//! CaptureStream for recording output in tests
//!
//! A cloneable writer: hand one clone to a [`crate::Konsole`] (directly or via
//! a redirect) and keep another to inspect what was written.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use strip_ansi_escapes::strip;

/// A writer that captures output for assertions.
///
/// Clones share the same buffer.
#[derive(Clone, Default)]
pub struct CaptureStream {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureStream {
    /// Create an empty capture stream
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bytes(&self) -> Vec<u8> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Everything written, escape directives included
    #[must_use]
    pub fn raw_string(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    /// Everything written, with escape directives removed
    #[must_use]
    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&strip(self.bytes())).into_owned()
    }

    /// Written lines, escape directives included
    #[must_use]
    pub fn raw_output(&self) -> Vec<String> {
        self.raw_string().lines().map(String::from).collect()
    }

    /// Written lines, with escape directives removed
    #[must_use]
    pub fn output(&self) -> Vec<String> {
        self.output_string().lines().map(String::from).collect()
    }

    /// Whether nothing has been written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Check if output contains a string (case-insensitive)
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        let output = self.output_string().to_lowercase();
        output.contains(&needle.to_lowercase())
    }

    /// Check if output contains all of the given strings
    #[must_use]
    pub fn contains_all(&self, needles: &[&str]) -> bool {
        needles.iter().all(|n| self.contains(n))
    }

    /// Check if output matches a regex pattern
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        match regex::Regex::new(pattern) {
            Ok(re) => re.is_match(&self.output_string()),
            Err(_) => false,
        }
    }

    /// Assert that output contains a string
    ///
    /// # Panics
    ///
    /// Panics if the output does not contain the needle string.
    pub fn assert_contains(&self, needle: &str) {
        assert!(
            self.contains(needle),
            "Output did not contain '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert that output does NOT contain a string
    ///
    /// # Panics
    ///
    /// Panics if the output contains the needle string.
    pub fn assert_not_contains(&self, needle: &str) {
        assert!(
            !self.contains(needle),
            "Output unexpectedly contained '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert output has specific number of lines
    ///
    /// # Panics
    ///
    /// Panics if the line count doesn't match expected.
    pub fn assert_line_count(&self, expected: usize) {
        let actual = self.output().len();
        assert_eq!(
            actual,
            expected,
            "Expected {} lines but got {}. Actual output:\n{}",
            expected,
            actual,
            self.output_string()
        );
    }

    /// Clear the buffer
    pub fn clear(&self) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for CaptureStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for CaptureStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureStream")
            .field("line_count", &self.output().len())
            .finish()
    }
}
