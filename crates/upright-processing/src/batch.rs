//! Batch processor: the per-file pipeline and the lazy log stream over a run

use std::collections::VecDeque;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use upright_core::{BatchConfig, BatchSummary, LogLine, PathRef, WriteStrategy};

use crate::error::ProcessError;
use crate::inputs::expand_inputs;
use crate::jpeg::{self, JpegFile};
use crate::metadata;
use crate::orientation::{resolve, Transform};

/// Result of processing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Orientation code found in the file, if any
    pub orientation: Option<u16>,
    pub transform: Transform,
    /// Whether the file on disk was replaced
    pub rewritten: bool,
    /// Why the EXIF block could not be read; the block was kept as stored
    pub metadata_error: Option<String>,
}

/// Runs the read, transform, strip, re-encode and write pipeline
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    config: BatchConfig,
}

impl BatchProcessor {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Start a run over `inputs`. Nothing is read until the first line is
    /// requested; each run re-scans directories and re-reads files.
    pub fn run(&self, inputs: Vec<PathRef>) -> BatchRun {
        BatchRun {
            processor: self.clone(),
            inputs,
            files: None,
            pending: VecDeque::new(),
            summary: BatchSummary::default(),
            cancel: None,
        }
    }

    /// Process a single file.
    ///
    /// Lines emitted through `log` come before any failure line the caller
    /// derives from the returned error. A malformed EXIF block does not stop
    /// the file: orientation is unknown, the block is carried over unchanged
    /// and the pixels are re-encoded as stored. The reason is returned in
    /// `FileOutcome::metadata_error`.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn process_file(
        &self,
        path: &Path,
        log: &mut dyn FnMut(LogLine),
    ) -> Result<FileOutcome, ProcessError> {
        let data = Bytes::from(std::fs::read(path)?);
        let mut file = JpegFile::parse(data.clone())?;
        let exif = file.exif();

        let (orientation, metadata_error) = match exif.as_deref().map(metadata::read_orientation) {
            None => (None, None),
            Some(Ok(code)) => (code, None),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Unreadable EXIF block, orientation unknown");
                (None, Some(e.to_string()))
            }
        };

        if let Some(code) = orientation {
            log(LogLine::Orientation {
                path: path.to_path_buf(),
                code,
            });
        }

        let transform = resolve(orientation.unwrap_or(0));
        let mut outcome = FileOutcome {
            path: path.to_path_buf(),
            orientation,
            transform,
            rewritten: false,
            metadata_error,
        };

        if !self.config.mode.writes_files() {
            return Ok(outcome);
        }

        let img = jpeg::decode(&data)?;

        // an unreadable block may still hold a tag that was never applied
        let strippable = exif.as_deref().filter(|_| outcome.metadata_error.is_none());
        let stripped = match strippable.map(metadata::strip_orientation) {
            Some(Ok(stripped)) => stripped.map(Bytes::from),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "EXIF block left as-is");
                None
            }
            None => None,
        };
        let tag_removed = stripped.is_some();
        if tag_removed {
            file.set_exif(stripped);
        }

        let output = if transform.is_identity() && outcome.metadata_error.is_none() {
            if !tag_removed {
                tracing::debug!("No orientation to bake in or strip, file left untouched");
                return Ok(outcome);
            }
            // pixels stay as stored, only the container changes
            file.into_bytes()
        } else {
            let img = transform.apply(img);
            let encoded = jpeg::encode(&img, self.config.jpeg_quality)?;
            jpeg::with_metadata(encoded, file.metadata_segments())?
        };

        replace_file(path, &output, self.config.write_strategy)?;
        outcome.rewritten = true;

        tracing::info!(
            transform = ?transform,
            bytes = output.len(),
            "Rewrote image"
        );

        Ok(outcome)
    }
}

/// Write `data` over `path` using `strategy`
fn replace_file(path: &Path, data: &[u8], strategy: WriteStrategy) -> Result<(), ProcessError> {
    match strategy {
        WriteStrategy::InPlace => std::fs::write(path, data)?,
        WriteStrategy::Atomic => {
            // rename over the link target, not the link
            let target = std::fs::canonicalize(path)?;
            let dir = target.parent().unwrap_or_else(|| Path::new("/"));

            let mut tmp = tempfile::Builder::new()
                .prefix(".upright-")
                .suffix(".tmp")
                .tempfile_in(dir)?;
            tmp.write_all(data)?;
            let permissions = std::fs::metadata(&target)?.permissions();
            tmp.as_file().set_permissions(permissions)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target)?;
        }
    }

    Ok(())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected failure".to_string()
    }
}

/// Lazy, finite stream of log lines for one run.
///
/// Files are processed one at a time as lines are pulled. Not restartable:
/// start a new run to process the inputs again.
pub struct BatchRun {
    processor: BatchProcessor,
    inputs: Vec<PathRef>,
    /// Expanded file list, filled on first poll
    files: Option<VecDeque<PathBuf>>,
    pending: VecDeque<LogLine>,
    summary: BatchSummary,
    cancel: Option<CancellationToken>,
}

impl BatchRun {
    /// Stop between files once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Counters so far; final once the iterator is exhausted
    pub fn summary(&self) -> BatchSummary {
        self.summary
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    fn expand(&mut self) {
        let inputs = std::mem::take(&mut self.inputs);
        let (files, failures) = expand_inputs(&inputs, self.processor.config.extension_match);

        tracing::info!(
            inputs = inputs.len(),
            files = files.len(),
            mode = ?self.processor.config.mode,
            "Starting batch"
        );

        self.pending.extend(failures);
        self.files = Some(files.into());
    }

    fn process(&mut self, path: PathBuf) {
        self.summary.files += 1;

        let mut lines = Vec::new();
        let processor = &self.processor;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            processor.process_file(&path, &mut |line| lines.push(line))
        }));
        self.pending.extend(lines);

        let failure = match result {
            Ok(Ok(outcome)) => {
                if let Some(message) = outcome.metadata_error {
                    self.pending.push_back(LogLine::Failed { path, message });
                }
                if !processor.config.mode.writes_files() {
                    self.summary.inspected += 1;
                } else if outcome.rewritten {
                    self.summary.rewritten += 1;
                } else {
                    self.summary.unchanged += 1;
                }
                return;
            }
            Ok(Err(e)) => e.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        tracing::warn!(path = %path.display(), error = %failure, "File failed");
        self.summary.failed += 1;
        self.pending.push_back(LogLine::Failed {
            path,
            message: failure,
        });
    }
}

impl Iterator for BatchRun {
    type Item = LogLine;

    fn next(&mut self) -> Option<LogLine> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(line);
            }

            if self.files.is_none() {
                self.expand();
                continue;
            }

            let remaining = self.files.as_ref().map_or(0, VecDeque::len);
            if remaining > 0 && self.is_cancelled() {
                tracing::info!(remaining, "Batch cancelled");
                self.summary.cancelled = true;
                if let Some(files) = self.files.as_mut() {
                    files.clear();
                }
            }

            let path = self.files.as_mut()?.pop_front()?;
            self.process(path);
        }
    }
}
