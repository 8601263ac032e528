use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::worker::task::FileTask;

/// Computes mirrored destination paths: the input root prefix of a source
/// path is replaced by the output root, the remaining relative structure is
/// preserved and the final extension is rewritten.
pub struct PathMirror {
    input_root: PathBuf,
    output_root: PathBuf,
}

impl PathMirror {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(input_root: P, output_root: Q) -> Self {
        Self {
            input_root: input_root.as_ref().to_path_buf(),
            output_root: output_root.as_ref().to_path_buf(),
        }
    }

    /// Mirrors `source` under the output root with `new_extension`.
    ///
    /// Extension rewriting goes through `Path::with_extension`, so short and
    /// extensionless names are handled correctly. A source outside the input
    /// root falls back to its bare file name placed at the output root, so
    /// every task still lands under the output root.
    pub fn mirror(&self, source: &Path, new_extension: &str) -> PathBuf {
        let relative = source
            .strip_prefix(&self.input_root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| {
                source
                    .file_name()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("output"))
            });

        self.output_root
            .join(relative)
            .with_extension(new_extension)
    }

    pub fn task_for(&self, source: &Path, new_extension: &str) -> FileTask {
        FileTask::new(source.to_path_buf(), self.mirror(source, new_extension))
    }

    /// Creates the destination's parent directories. Idempotent: an
    /// already-existing directory is not an error.
    pub fn ensure_parent(&self, dest: &Path) -> Result<(), StorageError> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mirror_rewrites_extension() {
        let mirror = PathMirror::new("/in", "/out");
        let dest = mirror.mirror(Path::new("/in/a.pdf"), "txt");
        assert_eq!(dest, PathBuf::from("/out/a.txt"));
    }

    #[test]
    fn test_mirror_preserves_relative_structure() {
        let mirror = PathMirror::new("/in", "/out");
        let dest = mirror.mirror(Path::new("/in/sub/deep/b.pdf"), "pdf");
        assert_eq!(dest, PathBuf::from("/out/sub/deep/b.pdf"));
    }

    #[test]
    fn test_mirror_handles_extensionless_names() {
        let mirror = PathMirror::new("/in", "/out");
        let dest = mirror.mirror(Path::new("/in/README"), "txt");
        assert_eq!(dest, PathBuf::from("/out/README.txt"));
    }

    #[test]
    fn test_mirror_handles_short_names() {
        let mirror = PathMirror::new("/in", "/out");
        let dest = mirror.mirror(Path::new("/in/a.x"), "txt");
        assert_eq!(dest, PathBuf::from("/out/a.txt"));
    }

    #[test]
    fn test_mirror_source_outside_root_falls_back_to_file_name() {
        let mirror = PathMirror::new("/in", "/out");
        let dest = mirror.mirror(Path::new("/elsewhere/c.pdf"), "txt");
        assert_eq!(dest, PathBuf::from("/out/c.txt"));
    }

    #[test]
    fn test_task_for_carries_both_paths() {
        let mirror = PathMirror::new("/in", "/out");
        let task = mirror.task_for(Path::new("/in/sub/b.pdf"), "txt");
        assert_eq!(task.source_path, PathBuf::from("/in/sub/b.pdf"));
        assert_eq!(task.dest_path, PathBuf::from("/out/sub/b.txt"));
    }

    #[test]
    fn test_ensure_parent_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let mirror = PathMirror::new("/in", temp_dir.path());
        let dest = temp_dir.path().join("sub/deep/b.txt");

        mirror.ensure_parent(&dest).unwrap();
        assert!(temp_dir.path().join("sub/deep").is_dir());

        // Idempotent on the second call.
        mirror.ensure_parent(&dest).unwrap();
    }
}
