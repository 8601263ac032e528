use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::warn;

use crate::tool::command::ToolCommand;
use crate::worker::task::{FileOutcome, FileTask};

/// How often a timed invocation polls the child for exit.
const TIMEOUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs one external command per file, draining stdout and stderr on their
/// own threads so a chatty child never deadlocks on a full pipe.
pub struct ToolInvoker {
    timeout: Option<Duration>,
}

impl ToolInvoker {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// Blocks until the child exits (or the opt-in timeout fires) and maps
    /// the result onto the task's outcome. Never returns an `Err`: every
    /// failure mode is data on the `FileOutcome`.
    pub fn invoke(&self, task: FileTask, command: ToolCommand) -> FileOutcome {
        let _span = tracing::info_span!(
            "tool.invoke",
            program = %command.program.display(),
            source = %task.source_path.display(),
        )
        .entered();

        let mut child = match Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return FileOutcome::tool_missing(
                    task,
                    format!("{} not found", command.program.display()),
                );
            }
            Err(e) => return FileOutcome::io_error(task, e.to_string()),
        };

        let stdout_handle = spawn_drain(child.stdout.take());
        let stderr_handle = spawn_drain(child.stderr.take());

        let status = match self.wait(&mut child) {
            Ok(Some(status)) => status,
            Ok(None) => {
                warn!(
                    "Tool invocation for {} exceeded timeout, killed",
                    task.source_path.display()
                );
                let captured_output = join_drain(stdout_handle);
                let captured_error = join_drain(stderr_handle);
                return FileOutcome::timed_out(task, captured_output, captured_error);
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return FileOutcome::io_error(task, e.to_string());
            }
        };

        let captured_output = join_drain(stdout_handle);
        let captured_error = join_drain(stderr_handle);

        if status.success() {
            FileOutcome::success(task, captured_output, captured_error)
        } else {
            FileOutcome::tool_failed(task, status.code(), captured_output, captured_error)
        }
    }

    /// `Ok(None)` means the timeout expired and the child was killed.
    fn wait(&self, child: &mut Child) -> std::io::Result<Option<ExitStatus>> {
        let Some(limit) = self.timeout else {
            return child.wait().map(Some);
        };

        let deadline = Instant::now() + limit;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Ok(None);
            }
            thread::sleep(TIMEOUT_POLL_INTERVAL);
        }
    }
}

impl Default for ToolInvoker {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_drain<R: Read + Send + 'static>(reader: Option<R>) -> Option<JoinHandle<String>> {
    reader.map(|mut reader| {
        thread::spawn(move || {
            let mut buffer = String::new();
            if reader.read_to_string(&mut buffer).is_err() {
                warn!("Failed to drain child output stream");
            }
            buffer
        })
    })
}

fn join_drain(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
