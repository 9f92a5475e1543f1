//! Expansion of tagged inputs into the flat list of files to process

use std::io;
use std::path::{Path, PathBuf};

use upright_core::{ExtensionMatch, LogLine, PathRef};

/// Immediate JPEG children of `dir`, sorted by path.
///
/// Subdirectories are never entered. Entries that are not regular files
/// (after following symlinks) are skipped.
pub fn expand_directory(dir: &Path, policy: ExtensionMatch) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if policy.is_jpeg(&path) && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Flatten `inputs` in order. Files pass through unchanged, directories
/// contribute their JPEG children. Duplicates are kept.
///
/// A directory that cannot be listed produces a failure line instead of files.
pub fn expand_inputs(inputs: &[PathRef], policy: ExtensionMatch) -> (Vec<PathBuf>, Vec<LogLine>) {
    let mut files = Vec::new();
    let mut failures = Vec::new();

    for input in inputs {
        match input {
            PathRef::File(path) => files.push(path.clone()),
            PathRef::Directory(dir) => match expand_directory(dir, policy) {
                Ok(children) => {
                    tracing::debug!(
                        directory = %dir.display(),
                        count = children.len(),
                        "Expanded directory"
                    );
                    files.extend(children);
                }
                Err(e) => {
                    tracing::warn!(directory = %dir.display(), error = %e, "Failed to list directory");
                    failures.push(LogLine::Failed {
                        path: dir.clone(),
                        message: format!("cannot list directory: {}", e),
                    });
                }
            },
        }
    }

    (files, failures)
}
