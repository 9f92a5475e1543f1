//! Upright Worker
//!
//! Runs one batch at a time off the interactive task and feeds its log lines
//! to a single consumer over a channel.

pub mod runner;

pub use runner::{BatchRunner, RunHandle, LOG_CHANNEL_CAPACITY};
