use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::OutputPolicy;
use crate::error::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    ProceedAfterClear,
    Abort,
}

/// Gates a batch on pre-existing content in the output root.
pub struct OutputGate {
    output_root: PathBuf,
}

impl OutputGate {
    pub fn new<P: AsRef<Path>>(output_root: P) -> Self {
        Self {
            output_root: output_root.as_ref().to_path_buf(),
        }
    }

    /// An empty output root always proceeds. A non-empty one follows the
    /// caller-supplied policy; a delete failure during clear surfaces as an
    /// error, which the runner treats as an abort.
    pub fn resolve(&self, policy: OutputPolicy) -> Result<Decision, StorageError> {
        if self.is_empty()? {
            return Ok(Decision::Proceed);
        }

        match policy {
            OutputPolicy::Overwrite => Ok(Decision::Proceed),
            OutputPolicy::Abort => Ok(Decision::Abort),
            OutputPolicy::Clear => {
                self.clear_top_level_files()?;
                Ok(Decision::ProceedAfterClear)
            }
        }
    }

    fn is_empty(&self) -> Result<bool, StorageError> {
        let mut entries =
            std::fs::read_dir(&self.output_root).map_err(|e| StorageError::ReadDirectory {
                path: self.output_root.clone(),
                source: e,
            })?;
        Ok(entries.next().is_none())
    }

    /// Deletes regular files directly inside the output root. Subdirectories
    /// are left untouched; the mirrored tree from a previous deep run is
    /// deliberately not removed, matching the historical behavior.
    fn clear_top_level_files(&self) -> Result<(), StorageError> {
        let entries =
            std::fs::read_dir(&self.output_root).map_err(|e| StorageError::ReadDirectory {
                path: self.output_root.clone(),
                source: e,
            })?;

        let mut removed = 0usize;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable output entry: {}", e);
                    continue;
                }
            };

            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }

            std::fs::remove_file(entry.path()).map_err(|e| StorageError::RemoveFile {
                path: entry.path(),
                source: e,
            })?;
            removed += 1;
        }

        info!(
            "Cleared {} files from output directory {}",
            removed,
            self.output_root.display()
        );
        Ok(())
    }
}
