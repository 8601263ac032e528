//! Test harness for isolated batch execution.
//!
//! Provides a temporary input/output tree plus fake external tools written
//! as small shell scripts, so ToolInvoker and BatchRunner run for real
//! without pdftotext, Ghostscript or qpdf installed.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use assert_fs::TempDir;

use pdfshop::config::{Action, JobRequest};

/// Answers the existence probe, echoes a line, then copies the source
/// argument to the destination argument. Handles both positional
/// `<src> <dst>` contracts and the compressor's `-sOutputFile=<dst> <src>`;
/// flag arguments are ignored when locating the paths.
pub const COPY_TOOL: &str = r#"#!/bin/sh
[ "$1" = "-v" ] && exit 0
[ "$1" = "--help" ] && exit 0
out=""
prev=""
last=""
for arg in "$@"; do
  case "$arg" in
    -sOutputFile=*) out="${arg#-sOutputFile=}" ;;
    -*) ;;
    *) prev="$last"; last="$arg" ;;
  esac
done
if [ -n "$out" ]; then
  src="$last"
  dst="$out"
else
  src="$prev"
  dst="$last"
fi
echo "converted $src"
cp "$src" "$dst"
"#;

/// Like COPY_TOOL but fails with exit 3 for any source whose name contains
/// "bad", leaving no destination file behind.
pub const FLAKY_TOOL: &str = r#"#!/bin/sh
[ "$1" = "-v" ] && exit 0
[ "$1" = "--help" ] && exit 0
out=""
prev=""
last=""
for arg in "$@"; do
  case "$arg" in
    -sOutputFile=*) out="${arg#-sOutputFile=}" ;;
    -*) ;;
    *) prev="$last"; last="$arg" ;;
  esac
done
if [ -n "$out" ]; then
  src="$last"
  dst="$out"
else
  src="$prev"
  dst="$last"
fi
case "$src" in
  *bad*)
    echo "cannot process $src" >&2
    exit 3
    ;;
esac
cp "$src" "$dst"
"#;

/// Answers the probe, then blocks far longer than any test timeout.
pub const SLOW_TOOL: &str = r#"#!/bin/sh
[ "$1" = "-v" ] && exit 0
[ "$1" = "--help" ] && exit 0
echo begun
exec sleep 30
"#;

pub struct TestHarness {
    temp_dir: TempDir,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub tool_path: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_tool(COPY_TOOL)
    }

    pub fn with_tool(script: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let input = temp_dir.child("input");
        input.create_dir_all().expect("Failed to create input dir");
        let output = temp_dir.child("output");
        output.create_dir_all().expect("Failed to create output dir");

        let tool = temp_dir.child("tool.sh");
        tool.write_str(script).expect("Failed to write fake tool");
        make_executable(tool.path());

        let input_dir = input.path().to_path_buf();
        let output_dir = output.path().to_path_buf();
        let tool_path = tool.path().to_path_buf();

        Self {
            temp_dir,
            input_dir,
            output_dir,
            tool_path,
        }
    }

    /// Base of the harness temp tree (the output archive lands here).
    pub fn base(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes an input file at a path relative to the input root, creating
    /// parent directories as needed.
    pub fn write_input(&self, relative: &str, content: &[u8]) -> PathBuf {
        let child = self.temp_dir.child(Path::new("input").join(relative));
        child
            .write_binary(content)
            .expect("Failed to write input file");
        child.path().to_path_buf()
    }

    /// A path under the output root, ready for `assert_fs` assertions.
    pub fn output_child(&self, relative: &str) -> ChildPath {
        self.temp_dir.child(Path::new("output").join(relative))
    }

    pub fn request(&self, action: Action) -> JobRequest {
        JobRequest::new(&self.input_dir, &self.output_dir, action, &self.tool_path)
    }
}

fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = std::fs::metadata(path)
        .expect("Failed to stat fake tool")
        .permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(path, permissions).expect("Failed to chmod fake tool");
}
