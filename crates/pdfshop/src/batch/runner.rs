use std::path::Path;
use std::thread::{self, JoinHandle};

use chrono::Utc;
use crossbeam_channel::Receiver;
use log::{error, info};
use tracing::info_span;

use crate::archive;
use crate::config::{ArchiveFormat, JobRequest};
use crate::error::{Result, StorageError, WorkerError};
use crate::storage::{Decision, OutputGate, PathMirror};
use crate::summary;
use crate::tool::{command, ToolCommand, ToolInvoker};
use crate::worker::scanner::DirectoryScanner;
use crate::worker::task::{FileOutcome, JobResult};

use super::progress::{BatchEvent, ChannelProgress, ProgressReporter};

/// Drives one batch: policy gate, discovery, per-file conversion, optional
/// archiving and the final summary. Files are processed strictly one at a
/// time in discovery order; only one batch may write an output root at a
/// time (no locking is implemented, this is a documented limitation).
pub struct BatchRunner {
    request: JobRequest,
}

impl BatchRunner {
    pub fn new(request: JobRequest) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &JobRequest {
        &self.request
    }

    /// Runs the batch to completion, pushing every `FileOutcome` through the
    /// reporter as it is produced. A single failed file never aborts the
    /// batch; only root-level failures (bad roots, failed probe, abort
    /// decision) return `Err`.
    pub fn run(&self, progress: &dyn ProgressReporter) -> Result<JobResult> {
        let _span = info_span!(
            "batch",
            action = ?self.request.action,
            input = %self.request.input_root.display(),
            output = %self.request.output_root.display(),
        )
        .entered();

        let started_at = Utc::now();

        // Pre-flight: the tool must answer its probe before any file is
        // attempted. A missing tool caught here is fatal to the whole job.
        command::probe(&self.request.tool_path, self.request.action.probe_flag())?;

        std::fs::create_dir_all(&self.request.output_root).map_err(|e| {
            StorageError::CreateDirectory {
                path: self.request.output_root.clone(),
                source: e,
            }
        })?;

        let gate = OutputGate::new(&self.request.output_root);
        match gate.resolve(self.request.output_policy)? {
            Decision::Abort => {
                return Err(WorkerError::Aborted(self.request.output_root.clone()).into())
            }
            Decision::Proceed | Decision::ProceedAfterClear => {}
        }

        let scanner = DirectoryScanner::new(
            &self.request.input_root,
            self.request.action.input_extension(),
        );
        let files = scanner.scan()?;
        progress.report(BatchEvent::Started {
            total_files: files.len(),
        });

        if files.is_empty() {
            info!(
                "No matching files under {}",
                self.request.input_root.display()
            );
        }

        let mirror = PathMirror::new(&self.request.input_root, &self.request.output_root);
        let invoker = match self.request.tool_timeout {
            Some(timeout) => ToolInvoker::with_timeout(timeout),
            None => ToolInvoker::new(),
        };

        let total = files.len();
        let mut outcomes = Vec::with_capacity(total);
        for (index, source) in files.iter().enumerate() {
            let outcome = self.process_file(&mirror, &invoker, source);
            if !outcome.is_success() {
                error!(
                    "Conversion failed for {}: {:?} {}",
                    source.display(),
                    outcome.status,
                    outcome.captured_error.trim()
                );
            }
            progress.report(BatchEvent::FileFinished {
                index,
                total,
                outcome: outcome.clone(),
            });
            outcomes.push(outcome);
        }

        let (archive_path, archive_error) = self.archive_output(progress);

        let summary = summary::summarize(
            &self.request.input_root,
            &self.request.output_root,
            self.request.action.input_extension(),
        )?;

        Ok(JobResult {
            outcomes,
            archive_path,
            archive_error,
            summary,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Spawns the batch on its own thread and hands back a lazy event
    /// sequence. The channel closes when the batch finishes; the final
    /// `JobResult` comes from joining the handle.
    pub fn stream(request: JobRequest) -> (Receiver<BatchEvent>, JoinHandle<Result<JobResult>>) {
        let (sender, receiver) = crossbeam_channel::bounded(32);
        let handle = thread::spawn(move || {
            let runner = BatchRunner::new(request);
            let progress = ChannelProgress::new(sender);
            runner.run(&progress)
        });
        (receiver, handle)
    }

    fn process_file(
        &self,
        mirror: &PathMirror,
        invoker: &ToolInvoker,
        source: &Path,
    ) -> FileOutcome {
        let task = mirror.task_for(source, self.request.action.output_extension());

        if let Err(e) = mirror.ensure_parent(&task.dest_path) {
            return FileOutcome::io_error(task, e.to_string());
        }

        let tool_command = ToolCommand::for_task(
            self.request.action,
            &self.request.tool_path,
            self.request.quality,
            &self.request.extra_flags,
            &task,
        );
        invoker.invoke(task, tool_command)
    }

    /// Archiving failure is reported and recorded but leaves the batch
    /// result valid. A partially written archive is not cleaned up.
    fn archive_output(
        &self,
        progress: &dyn ProgressReporter,
    ) -> (Option<std::path::PathBuf>, Option<String>) {
        if self.request.archive_format == ArchiveFormat::None {
            return (None, None);
        }

        let dest =
            archive::default_archive_path(&self.request.output_root, self.request.archive_format);
        match archive::archive(&self.request.output_root, &dest, self.request.archive_format) {
            Ok(()) => {
                progress.report(BatchEvent::ArchiveWritten { path: dest.clone() });
                (Some(dest), None)
            }
            Err(e) => {
                error!("Archiving {} failed: {}", dest.display(), e);
                progress.report(BatchEvent::ArchiveFailed {
                    error: e.to_string(),
                });
                (None, Some(e.to_string()))
            }
        }
    }
}
