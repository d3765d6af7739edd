//! Logging for the AI model service
//!
//! This crate installs the global `tracing` subscriber, with a console
//! output in the configured format and an optional rolling file output.

pub mod formatter;
pub mod logger;

// Re-export commonly used types
pub use formatter::LogFormat;
pub use logger::{Logger, LoggerGuard};
