use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::debug;

use crate::config::{Action, Quality};
use crate::error::WorkerError;
use crate::worker::task::FileTask;

/// A fully built external command line for one file conversion.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new<P: AsRef<Path>>(program: P, args: Vec<OsString>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args,
        }
    }

    /// Builds the action-specific command line for one task. The argument
    /// contracts are fixed:
    /// - text extraction: `-layout -nopgbrk -enc UTF-8 <src> <dst>`
    /// - compression: the pdfwrite device/compatibility/quality/batch flag
    ///   set, `-sOutputFile=<dst>`, `<src>`, then caller-supplied extras
    /// - decompression: `--linearize <src> <dst>`
    pub fn for_task(
        action: Action,
        tool_path: &Path,
        quality: Quality,
        extra_flags: &[String],
        task: &FileTask,
    ) -> Self {
        let mut args: Vec<OsString> = Vec::new();

        match action {
            Action::ExtractText => {
                args.extend(["-layout", "-nopgbrk", "-enc", "UTF-8"].map(OsString::from));
                args.push(task.source_path.as_os_str().to_os_string());
                args.push(task.dest_path.as_os_str().to_os_string());
            }
            Action::Compress => {
                args.extend(
                    [
                        "-sDEVICE=pdfwrite",
                        "-dCompatibilityLevel=1.4",
                    ]
                    .map(OsString::from),
                );
                args.push(OsString::from(format!(
                    "-dPDFSETTINGS=/{}",
                    quality.as_str()
                )));
                args.extend(["-dNOPAUSE", "-dQUIET", "-dBATCH"].map(OsString::from));

                let mut output_flag = OsString::from("-sOutputFile=");
                output_flag.push(task.dest_path.as_os_str());
                args.push(output_flag);

                args.push(task.source_path.as_os_str().to_os_string());
                args.extend(extra_flags.iter().map(OsString::from));
            }
            Action::Decompress => {
                args.push(OsString::from("--linearize"));
                args.push(task.source_path.as_os_str().to_os_string());
                args.push(task.dest_path.as_os_str().to_os_string());
            }
        }

        Self::new(tool_path, args)
    }
}

/// Pre-flight existence check: runs the tool with its probe flag and demands
/// a zero exit. A missing or broken tool is batch-fatal when caught here.
pub fn probe(tool_path: &Path, probe_flag: &str) -> Result<(), WorkerError> {
    debug!("Probing tool {} with {}", tool_path.display(), probe_flag);

    let status = Command::new(tool_path)
        .arg(probe_flag)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(WorkerError::ToolUnavailable {
            tool: tool_path.to_path_buf(),
            reason: format!("probe exited with {}", status),
        }),
        Err(e) => Err(WorkerError::ToolUnavailable {
            tool: tool_path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}
