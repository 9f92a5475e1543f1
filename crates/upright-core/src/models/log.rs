use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One line of batch output, in processing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LogLine {
    /// An orientation tag was found on `path`
    Orientation { path: PathBuf, code: u16 },
    /// Processing `path` failed; the batch continued
    Failed { path: PathBuf, message: String },
}

impl LogLine {
    pub fn path(&self) -> &Path {
        match self {
            LogLine::Orientation { path, .. } | LogLine::Failed { path, .. } => path,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, LogLine::Failed { .. })
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLine::Orientation { path, code } => write!(f, "{} : {}", path.display(), code),
            LogLine::Failed { path, message } => {
                write!(f, "{} : error: {}", path.display(), message)
            }
        }
    }
}

/// Counters accumulated over one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Files taken from the expanded input list
    pub files: usize,
    pub rewritten: usize,
    /// Files left untouched because there was nothing to bake in or strip
    pub unchanged: usize,
    /// Files read in inspect mode
    pub inspected: usize,
    pub failed: usize,
    pub cancelled: bool,
}
