use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::summary::JobSummaryData;

/// One discovered file and the mirrored destination its output goes to.
/// Derived deterministically from the request; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
}

impl FileTask {
    pub fn new(source_path: PathBuf, dest_path: PathBuf) -> Self {
        Self {
            source_path,
            dest_path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    ToolMissing,
    ToolFailed,
    IoError,
    TimedOut,
}

/// Terminal result of attempting one file's conversion. The full set of
/// outcomes for a batch is the authoritative result log.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub task: FileTask,
    pub status: OutcomeStatus,
    pub captured_output: String,
    pub captured_error: String,
    pub exit_code: Option<i32>,
}

impl FileOutcome {
    pub fn success(task: FileTask, captured_output: String, captured_error: String) -> Self {
        Self {
            task,
            status: OutcomeStatus::Success,
            captured_output,
            captured_error,
            exit_code: Some(0),
        }
    }

    pub fn tool_missing(task: FileTask, message: String) -> Self {
        Self {
            task,
            status: OutcomeStatus::ToolMissing,
            captured_output: String::new(),
            captured_error: message,
            exit_code: None,
        }
    }

    pub fn tool_failed(
        task: FileTask,
        exit_code: Option<i32>,
        captured_output: String,
        captured_error: String,
    ) -> Self {
        Self {
            task,
            status: OutcomeStatus::ToolFailed,
            captured_output,
            captured_error,
            exit_code,
        }
    }

    pub fn io_error(task: FileTask, message: String) -> Self {
        Self {
            task,
            status: OutcomeStatus::IoError,
            captured_output: String::new(),
            captured_error: message,
            exit_code: None,
        }
    }

    pub fn timed_out(task: FileTask, captured_output: String, captured_error: String) -> Self {
        Self {
            task,
            status: OutcomeStatus::TimedOut,
            captured_output,
            captured_error,
            exit_code: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// Owned by the caller once the batch returns.
#[derive(Debug)]
pub struct JobResult {
    /// One outcome per discovered file, in discovery order.
    pub outcomes: Vec<FileOutcome>,
    pub archive_path: Option<PathBuf>,
    /// Set when archiving was requested but failed; the batch result is
    /// still valid in that case.
    pub archive_error: Option<String>,
    pub summary: JobSummaryData,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl JobResult {
    /// Discovery matched no files at all. Distinct from "every file failed",
    /// which has outcomes recorded.
    pub fn nothing_to_do(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> FileTask {
        FileTask::new(PathBuf::from("/in/a.pdf"), PathBuf::from("/out/a.txt"))
    }

    #[test]
    fn test_success_outcome() {
        let outcome = FileOutcome::success(task(), "done".to_string(), String::new());
        assert!(outcome.is_success());
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.captured_output, "done");
    }

    #[test]
    fn test_tool_failed_outcome() {
        let outcome = FileOutcome::tool_failed(
            task(),
            Some(3),
            String::new(),
            "broken xref".to_string(),
        );
        assert!(!outcome.is_success());
        assert_eq!(outcome.status, OutcomeStatus::ToolFailed);
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.captured_error, "broken xref");
    }

    #[test]
    fn test_timed_out_outcome_has_no_exit_code() {
        let outcome = FileOutcome::timed_out(task(), "partial".to_string(), String::new());
        assert_eq!(outcome.status, OutcomeStatus::TimedOut);
        assert!(outcome.exit_code.is_none());
        assert_eq!(outcome.captured_output, "partial");
    }

    #[test]
    fn test_job_result_counters() {
        let result = JobResult {
            outcomes: vec![
                FileOutcome::success(task(), String::new(), String::new()),
                FileOutcome::tool_failed(task(), Some(1), String::new(), String::new()),
            ],
            archive_path: None,
            archive_error: None,
            summary: JobSummaryData::default(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };

        assert!(!result.nothing_to_do());
        assert_eq!(result.success_count(), 1);
        assert_eq!(result.failure_count(), 1);
    }

    #[test]
    fn test_job_result_nothing_to_do() {
        let result = JobResult {
            outcomes: vec![],
            archive_path: None,
            archive_error: None,
            summary: JobSummaryData::default(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };

        assert!(result.nothing_to_do());
        assert_eq!(result.failure_count(), 0);
    }
}
