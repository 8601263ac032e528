use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::WorkerError;

/// Recursively enumerates files under an input root that match an extension,
/// case-insensitively, in a stable lexicographic order. Symbolic links are
/// not followed.
pub struct DirectoryScanner {
    input_root: PathBuf,
    extension: String,
}

impl DirectoryScanner {
    pub fn new<P: AsRef<Path>>(input_root: P, extension: &str) -> Self {
        Self {
            input_root: input_root.as_ref().to_path_buf(),
            extension: extension.to_string(),
        }
    }

    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    pub fn scan(&self) -> Result<Vec<PathBuf>, WorkerError> {
        if !self.input_root.is_dir() {
            return Err(WorkerError::BadInputRoot(self.input_root.clone()));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(&self.input_root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // Only a failure on the root itself is batch-fatal;
                    // entries that vanish or deny access mid-walk are skipped.
                    if e.depth() == 0 {
                        return Err(WorkerError::ScanFailed {
                            path: self.input_root.clone(),
                            source: e,
                        });
                    }
                    warn!("Skipping unreadable entry during scan: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if self.matches(entry.path()) {
                debug!("Found document: {}", entry.path().display());
                files.push(entry.path().to_path_buf());
            }
        }

        info!(
            "Scanned {} matching files in {}",
            files.len(),
            self.input_root.display()
        );
        Ok(files)
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }
}
