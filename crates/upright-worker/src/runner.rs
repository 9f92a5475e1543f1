//! Batch runner: blocking worker, log channel, overlap guard and cancellation.
//!
//! The batch itself is a plain sequential loop; it runs on the blocking pool
//! so the caller's task stays responsive. Overlapping runs are rejected, not
//! queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use upright_core::{BatchSummary, LogLine, PathRef, UprightError};
use upright_processing::BatchProcessor;

/// Lines buffered between the worker and the consumer before the worker waits
pub const LOG_CHANNEL_CAPACITY: usize = 64;

/// Clears the busy flag when the worker finishes, even on panic
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct BatchRunner {
    processor: BatchProcessor,
    busy: Arc<AtomicBool>,
}

impl BatchRunner {
    pub fn new(processor: BatchProcessor) -> Self {
        Self {
            processor,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Start a batch on the blocking pool. Must be called inside a Tokio runtime.
    ///
    /// Returns [`UprightError::AlreadyRunning`] while a previous run started by
    /// this runner is still in flight.
    #[tracing::instrument(skip_all, fields(inputs = inputs.len()))]
    pub fn start(&self, inputs: Vec<PathRef>) -> Result<RunHandle, UprightError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Rejected overlapping batch");
            return Err(UprightError::AlreadyRunning);
        }
        let guard = BusyGuard(self.busy.clone());

        let (tx, rx) = mpsc::channel(LOG_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let mut run = self.processor.run(inputs).with_cancellation(cancel.clone());

        let worker = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            let mut display_open = true;

            for line in run.by_ref() {
                if display_open && tx.blocking_send(line).is_err() {
                    tracing::debug!("Log receiver dropped, continuing without display");
                    display_open = false;
                }
            }

            let summary = run.summary();
            tracing::info!(
                files = summary.files,
                rewritten = summary.rewritten,
                unchanged = summary.unchanged,
                inspected = summary.inspected,
                failed = summary.failed,
                cancelled = summary.cancelled,
                "Batch finished"
            );
            summary
        });

        Ok(RunHandle {
            lines: rx,
            cancel,
            worker,
        })
    }
}

/// Consumer side of a running batch
pub struct RunHandle {
    lines: mpsc::Receiver<LogLine>,
    cancel: CancellationToken,
    worker: JoinHandle<BatchSummary>,
}

impl RunHandle {
    /// Next log line in processing order; `None` once the batch has ended
    pub async fn next_line(&mut self) -> Option<LogLine> {
        self.lines.recv().await
    }

    /// Ask the worker to stop before the next file
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the worker and return its counters.
    ///
    /// Lines not yet received are discarded; the worker keeps processing
    /// the remaining files.
    pub async fn finish(self) -> Result<BatchSummary, UprightError> {
        let RunHandle { lines, worker, .. } = self;
        drop(lines);

        worker
            .await
            .map_err(|e| UprightError::Internal(format!("batch worker failed: {}", e)))
    }
}
