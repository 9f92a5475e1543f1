use std::path::PathBuf;

use upright_core::{LogLine, PathRef, UprightError};

/// Tag each command-line path as file or directory.
///
/// Any missing or unusable path fails the whole invocation before a single
/// file is touched.
pub fn resolve_inputs(paths: &[PathBuf]) -> Result<Vec<PathRef>, UprightError> {
    if paths.is_empty() {
        return Err(UprightError::NoInputs);
    }

    paths.iter().map(|p| PathRef::classify(p.clone())).collect()
}

/// Render a log line for stdout, as plain text or one JSON object per line
pub fn format_line(line: &LogLine, json: bool) -> Result<String, serde_json::Error> {
    if json {
        serde_json::to_string(line)
    } else {
        Ok(line.to_string())
    }
}


/// Initialize tracing for the CLI. Diagnostics go to stderr so stdout carries
/// only log lines.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
