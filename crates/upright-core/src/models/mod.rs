//! Data models for a batch run
//!
//! Inputs, operating modes and the log stream produced by the batch processor.

mod input;
mod log;
mod mode;

pub use input::*;
pub use log::*;
pub use mode::*;
