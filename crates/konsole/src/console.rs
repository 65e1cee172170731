//! The konsole handler: formatter, threshold and output stream in one place.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::config::Config;
use crate::error::Result;
use crate::logging::{KonsoleFormatter, LogRecord};
use crate::severity::Severity;

/// A writable destination for formatted records.
pub type Stream = Box<dyn Write + Send>;

/// Formats records and writes them to a swappable stream.
///
/// One `Konsole` serves as the process-wide `log` backend (see
/// [`konsole()`] and [`crate::init`]); tests and embedders can create their
/// own. Color and threshold are atomics. The stream sits behind a mutex and
/// every record is written while holding it, so lines never interleave.
pub struct Konsole {
    formatter: KonsoleFormatter,
    threshold: AtomicU8,
    stream: Mutex<Stream>,
    installed: AtomicBool,
}

impl Konsole {
    /// Create a handler writing to stderr, with detected color and an INFO
    /// threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::with_formatter(KonsoleFormatter::default(), Box::new(io::stderr()))
    }

    /// Create a handler writing to the given stream.
    #[must_use]
    pub fn with_stream<W: Write + Send + 'static>(stream: W, color: bool) -> Self {
        Self::with_formatter(KonsoleFormatter::new(color), Box::new(stream))
    }

    /// Create a handler from its parts.
    #[must_use]
    pub fn with_formatter(formatter: KonsoleFormatter, stream: Stream) -> Self {
        Self {
            formatter,
            threshold: AtomicU8::new(Severity::Info as u8),
            stream: Mutex::new(stream),
            installed: AtomicBool::new(false),
        }
    }

    // ─────────────────────────────────────────────────
    // Policy
    // ─────────────────────────────────────────────────

    /// The formatter in use
    pub fn formatter(&self) -> &KonsoleFormatter {
        &self.formatter
    }

    /// Whether output is colored
    pub fn color(&self) -> bool {
        self.formatter.color()
    }

    /// Turn color on or off
    pub fn set_color(&self, enabled: bool) {
        self.formatter.set_color(enabled);
    }

    /// Minimum severity rendered
    pub fn threshold(&self) -> Severity {
        Severity::from_u8(self.threshold.load(Ordering::Relaxed))
    }

    /// Set the minimum severity rendered.
    ///
    /// When this handler is the global `log` backend, the facade's max level
    /// follows so disabled records are dropped before they are built.
    pub fn set_threshold(&self, severity: Severity) {
        self.threshold.store(severity as u8, Ordering::Relaxed);
        if self.is_installed() {
            log::set_max_level(severity.to_level_filter());
        }
    }

    /// Set the threshold from a volume, see [`Severity::from_volume`].
    pub fn set_volume(&self, volume: i32) {
        self.set_threshold(Severity::from_volume(volume));
    }

    /// Apply every setting present in the config.
    pub fn configure(&self, config: &Config) {
        if let Some(threshold) = config.resolve_threshold() {
            self.set_threshold(threshold);
        }
        if let Some(color) = config.color {
            self.set_color(color);
        }
    }

    /// Whether records of this severity are rendered.
    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity >= self.threshold()
    }

    /// Whether this handler is the global `log` backend.
    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    pub(crate) fn mark_installed(&self) {
        self.installed.store(true, Ordering::Release);
        log::set_max_level(self.threshold().to_level_filter());
    }

    // ─────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────

    /// Format and write a record if its severity passes the threshold.
    ///
    /// Returns whether the record was written.
    pub fn emit(&self, record: &LogRecord) -> Result<bool> {
        if !self.is_enabled(record.severity) {
            return Ok(false);
        }

        let mut text = self.formatter.format(record);
        text.push('\n');

        let mut stream = self.lock_stream();
        stream.write_all(text.as_bytes())?;
        stream.flush()?;
        Ok(true)
    }

    /// Flush the current stream.
    pub fn flush(&self) -> Result<()> {
        self.lock_stream().flush()?;
        Ok(())
    }

    /// Install a new stream, returning the previous one.
    pub fn replace_stream(&self, stream: Stream) -> Stream {
        std::mem::replace(&mut *self.lock_stream(), stream)
    }

    /// Redirect output to `stream` until the returned guard is dropped.
    ///
    /// The previous stream comes back on every exit path, including early
    /// returns and panics. Redirections may nest as long as guards are
    /// dropped in reverse order.
    ///
    /// ```
    /// use konsole::{Konsole, LogRecord, Severity};
    /// use konsole::testing::CaptureStream;
    ///
    /// let konsole = Konsole::with_stream(std::io::sink(), false);
    /// let capture = CaptureStream::new();
    /// {
    ///     let _guard = konsole.redirect(capture.clone());
    ///     konsole.emit(&LogRecord::new(Severity::Error, "captured")).unwrap();
    /// }
    /// konsole.emit(&LogRecord::new(Severity::Error, "discarded")).unwrap();
    /// assert_eq!(capture.output(), vec!["[ERROR] captured."]);
    /// ```
    #[must_use = "output is restored as soon as the guard is dropped"]
    pub fn redirect<W: Write + Send + 'static>(&self, stream: W) -> RedirectGuard<'_> {
        let previous = self.replace_stream(Box::new(stream));
        RedirectGuard {
            konsole: self,
            previous: Some(previous),
        }
    }

    /// Run `scope` with output redirected to `stream`.
    pub fn redirect_with<W, F, T>(&self, stream: W, scope: F) -> T
    where
        W: Write + Send + 'static,
        F: FnOnce() -> T,
    {
        let _guard = self.redirect(stream);
        scope()
    }

    fn lock_stream(&self) -> MutexGuard<'_, Stream> {
        // A panic while writing leaves the stream usable.
        self.stream.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Konsole {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Konsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Konsole")
            .field("color", &self.color())
            .field("threshold", &self.threshold())
            .field("installed", &self.is_installed())
            .finish_non_exhaustive()
    }
}

/// Restores the previous stream when dropped.
pub struct RedirectGuard<'a> {
    konsole: &'a Konsole,
    previous: Option<Stream>,
}

impl Drop for RedirectGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            let mut redirected = self.konsole.replace_stream(previous);
            let _ = redirected.flush();
        }
    }
}

impl std::fmt::Debug for RedirectGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectGuard").finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────
// Global Konsole Accessor
// ─────────────────────────────────────────────────────────

static KONSOLE: OnceLock<Konsole> = OnceLock::new();

/// Get the process-wide konsole instance.
#[must_use]
pub fn konsole() -> &'static Konsole {
    KONSOLE.get_or_init(Konsole::new)
}
