use std::path::Path;

use log::warn;
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::WorkerError;
use crate::worker::scanner::DirectoryScanner;

/// Aggregate statistics over the input and output roots, computed after a
/// batch finishes. The file count is recomputed with the job's match
/// predicate so it reflects the current state of the input tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobSummaryData {
    pub file_count: usize,
    pub folder_count: usize,
    pub input_size: u64,
    pub output_size: u64,
}

impl JobSummaryData {
    /// Human-readable block for display to the user.
    pub fn render(&self, input_root: &Path, output_root: &Path) -> String {
        format!(
            "Job Summary:\n\n\
             Input Directory: {}\n\
             Output Directory: {}\n\
             Number of Files Processed: {}\n\
             Number of Folders: {}\n\
             Initial Size: {}\n\
             Final Size: {}",
            input_root.display(),
            output_root.display(),
            self.file_count,
            self.folder_count,
            format_bytes(self.input_size),
            format_bytes(self.output_size),
        )
    }
}

pub fn summarize(
    input_root: &Path,
    output_root: &Path,
    extension: &str,
) -> Result<JobSummaryData, WorkerError> {
    let file_count = DirectoryScanner::new(input_root, extension).scan()?.len();

    // Immediate child directories only.
    let folder_count = std::fs::read_dir(input_root)
        .map_err(|e| WorkerError::ReadDir {
            path: input_root.to_path_buf(),
            source: e,
        })?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .count();

    Ok(JobSummaryData {
        file_count,
        folder_count,
        input_size: folder_size(input_root),
        output_size: folder_size(output_root),
    })
}

/// Total bytes of regular files under `root`, recursive, symlinks excluded.
/// Unreadable entries are skipped rather than failing the summary.
pub fn folder_size(root: &Path) -> u64 {
    let mut total = 0u64;
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry while sizing: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(metadata) => total += metadata.len(),
            Err(e) => warn!("Skipping unsizable file {}: {}", entry.path().display(), e),
        }
    }
    total
}

/// Formats a byte count with 1024-based units and two decimal places.
/// Pure and monotonic; crosses each unit boundary exactly at 1024.
pub fn format_bytes(size: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", value, UNITS[unit])
}
