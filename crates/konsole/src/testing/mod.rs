//! Testing utilities for konsole output
//!
//! Provides `CaptureStream` for capturing and asserting on formatted output.

mod capture;

pub use capture::CaptureStream;
