use serde::{Deserialize, Serialize};

use crate::error::UprightError;

/// What a batch does with each file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// Read the tag, bake the transform into the pixels, strip the tag, re-save
    #[default]
    Rewrite,
    /// Read and log the tag only; files are never written
    Inspect,
}

impl OperatingMode {
    pub fn parse(s: &str) -> Result<Self, UprightError> {
        match s.to_lowercase().as_str() {
            "rewrite" => Ok(OperatingMode::Rewrite),
            "inspect" | "read-only" => Ok(OperatingMode::Inspect),
            _ => Err(UprightError::Config(format!("Invalid mode: {}", s))),
        }
    }

    pub fn writes_files(self) -> bool {
        matches!(self, OperatingMode::Rewrite)
    }
}

/// How a re-encoded image replaces the original file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteStrategy {
    /// Write a sibling temp file, then rename it over the original
    #[default]
    Atomic,
    /// Truncate and write the original path directly
    InPlace,
}

impl WriteStrategy {
    pub fn parse(s: &str) -> Result<Self, UprightError> {
        match s.to_lowercase().as_str() {
            "atomic" => Ok(WriteStrategy::Atomic),
            "in-place" | "inplace" => Ok(WriteStrategy::InPlace),
            _ => Err(UprightError::Config(format!(
                "Invalid write strategy: {}",
                s
            ))),
        }
    }
}
