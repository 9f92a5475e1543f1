//! Upright Core Library
//!
//! Domain models, error types and configuration shared by the processing,
//! worker and CLI crates.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::BatchConfig;
pub use error::{LogLevel, UprightError};
pub use models::{
    BatchSummary, ExtensionMatch, LogLine, OperatingMode, PathRef, WriteStrategy,
};
