use std::path::PathBuf;

use crossbeam_channel::Sender;

use crate::worker::task::FileOutcome;

/// Events emitted while a batch runs, in order. Per-file outcomes arrive as
/// soon as each file finishes so a slow batch is observable file-by-file.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started {
        total_files: usize,
    },
    FileFinished {
        index: usize,
        total: usize,
        outcome: FileOutcome,
    },
    ArchiveWritten {
        path: PathBuf,
    },
    ArchiveFailed {
        error: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: BatchEvent);
}

/// No-op reporter for unit tests and callers that only want the final result.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: BatchEvent) {}
}

/// Forwards events over a crossbeam channel for callers that consume the
/// batch as a lazy sequence. A disconnected receiver is ignored; the batch
/// keeps running to completion either way.
pub struct ChannelProgress {
    sender: Sender<BatchEvent>,
}

impl ChannelProgress {
    pub fn new(sender: Sender<BatchEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressReporter for ChannelProgress {
    fn report(&self, event: BatchEvent) {
        let _ = self.sender.send(event);
    }
}
