pub mod archive;
pub mod batch;
pub mod config;
pub mod error;
pub mod storage;
pub mod summary;
pub mod telemetry;
pub mod tool;
pub mod worker;

pub use batch::{BatchEvent, BatchRunner, ChannelProgress, NoopProgress, ProgressReporter};
pub use config::{
    load_settings, Action, ArchiveFormat, JobRequest, OutputPolicy, Quality, Settings,
};
pub use error::{
    ArchiveError, ConfigError, PdfshopError, Result, StorageError, WorkerError,
};
pub use storage::{Decision, OutputGate, PathMirror};
pub use summary::{format_bytes, JobSummaryData};
pub use worker::{DirectoryScanner, FileOutcome, FileTask, JobResult, OutcomeStatus};
