//! Configuration module
//!
//! Batch settings read from the environment (and a `.env` file when present).
//! Command-line flags override these values in the CLI.

use std::env;

use crate::error::UprightError;
use crate::models::{ExtensionMatch, OperatingMode, WriteStrategy};

/// Maximum JPEG quality; the default for re-encoding
pub const MAX_JPEG_QUALITY: u8 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    pub mode: OperatingMode,
    pub jpeg_quality: u8,
    pub write_strategy: WriteStrategy,
    pub extension_match: ExtensionMatch,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            mode: OperatingMode::Rewrite,
            jpeg_quality: MAX_JPEG_QUALITY,
            write_strategy: WriteStrategy::Atomic,
            extension_match: ExtensionMatch::CaseInsensitive,
        }
    }
}

impl BatchConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; unset keys keep defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mode = match lookup("UPRIGHT_MODE") {
            Some(value) => OperatingMode::parse(&value)?,
            None => defaults.mode,
        };

        let jpeg_quality = match lookup("UPRIGHT_JPEG_QUALITY") {
            Some(value) => value.trim().parse::<u8>().map_err(|_| {
                UprightError::Config(format!(
                    "UPRIGHT_JPEG_QUALITY must be an integer between 1 and {}, got {:?}",
                    MAX_JPEG_QUALITY, value
                ))
            })?,
            None => defaults.jpeg_quality,
        };

        let write_strategy = match lookup("UPRIGHT_WRITE_STRATEGY") {
            Some(value) => WriteStrategy::parse(&value)?,
            None => defaults.write_strategy,
        };

        let extension_match = match lookup("UPRIGHT_EXTENSION_MATCH") {
            Some(value) => ExtensionMatch::parse(&value)?,
            None => defaults.extension_match,
        };

        let config = Self {
            mode,
            jpeg_quality,
            write_strategy,
            extension_match,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), UprightError> {
        if self.jpeg_quality == 0 || self.jpeg_quality > MAX_JPEG_QUALITY {
            return Err(UprightError::Config(format!(
                "JPEG quality must be between 1 and {}, got {}",
                MAX_JPEG_QUALITY, self.jpeg_quality
            )));
        }

        Ok(())
    }
}
