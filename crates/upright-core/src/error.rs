//! Error types module
//!
//! Startup-level errors: anything that stops a batch from starting at all.
//! Per-file failures never surface here; they are reported as log lines by
//! the batch processor.

use std::path::PathBuf;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like a rejected overlapping run
    Debug,
    /// Warning level - for bad user input
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum UprightError {
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No inputs given")]
    NoInputs,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("A batch is already running")]
    AlreadyRunning,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl UprightError {
    /// Level the CLI reports this error at
    pub fn log_level(&self) -> LogLevel {
        match self {
            UprightError::AlreadyRunning => LogLevel::Debug,
            UprightError::NotFound(_)
            | UprightError::InvalidInput(_)
            | UprightError::NoInputs
            | UprightError::Config(_) => LogLevel::Warn,
            UprightError::Internal(_) => LogLevel::Error,
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            UprightError::NotFound(_) | UprightError::InvalidInput(_) | UprightError::NoInputs => 2,
            UprightError::Config(_) => 3,
            UprightError::AlreadyRunning | UprightError::Internal(_) => 1,
        }
    }
}
