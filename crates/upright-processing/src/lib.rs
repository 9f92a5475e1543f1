//! Upright Processing Library
//!
//! Maps EXIF orientation codes to pixel transforms and runs the per-file
//! read, transform, strip, re-encode and write pipeline over a batch of JPEGs.

pub mod batch;
pub mod error;
pub mod inputs;
pub mod jpeg;
pub mod metadata;
pub mod orientation;

// Re-export commonly used types
pub use batch::{BatchProcessor, BatchRun, FileOutcome};
pub use error::ProcessError;
pub use inputs::{expand_directory, expand_inputs};
pub use orientation::{resolve, Transform};
