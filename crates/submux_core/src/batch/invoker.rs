//! Tool invocation boundary.
//!
//! `ToolInvoker` is the seam between the batch processor and the external
//! muxing tool: the processor hands over a complete command (tool path
//! first) and gets back the exit code and captured streams, or a
//! distinguished not-found error. Tests substitute a scripted
//! implementation; `ProcessInvoker` is the real one.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Captured result of one tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit code (-1 if terminated by signal).
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the tool reported success.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

impl From<std::process::Output> for ToolOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Errors from launching or waiting on the tool.
#[derive(Error, Debug)]
pub enum InvokeError {
    /// The tool binary could not be located or executed at all. This is
    /// the one condition that aborts an in-progress batch.
    #[error("tool '{program}' not found or not executable")]
    ToolNotFound { program: String },

    /// The process could not be run for a reason other than absence.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The invocation exceeded the configured timeout and was killed.
    #[error("tool run exceeded the {}s timeout", .0.as_secs())]
    TimedOut(Duration),

    /// An empty command was passed in.
    #[error("empty tool command")]
    EmptyCommand,
}

/// Synchronous tool invocation seam.
///
/// The core treats this as an opaque call; it owns no knowledge of how
/// the process is spawned.
pub trait ToolInvoker: Send + Sync {
    /// Run the command (tool path first) to completion and capture output.
    fn invoke(&self, command: &[String]) -> Result<ToolOutput, InvokeError>;

    /// Check once, before a batch starts, that the tool can be launched.
    fn locate(&self) -> Result<(), InvokeError> {
        Ok(())
    }
}

/// Real invoker backed by `std::process::Command`.
///
/// Supports an optional per-invocation timeout; on expiry the child is
/// killed and the invocation reports `TimedOut` (a per-pair failure, not
/// a batch abort).
pub struct ProcessInvoker {
    tool_path: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessInvoker {
    /// Create an invoker for the given tool path.
    pub fn new(tool_path: impl Into<PathBuf>) -> Self {
        Self {
            tool_path: tool_path.into(),
            timeout: None,
        }
    }

    /// Set a per-invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn invoke_with_deadline(
        &self,
        program: &str,
        args: &[String],
        limit: Duration,
    ) -> Result<ToolOutput, InvokeError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(program, e))?;

        let stdout_reader = spawn_stream_reader(child.stdout.take());
        let stderr_reader = spawn_stream_reader(child.stderr.take());

        let deadline = Instant::now() + limit;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    return Ok(ToolOutput {
                        exit_code: status.code().unwrap_or(-1),
                        stdout: stdout_reader.join().unwrap_or_default(),
                        stderr: stderr_reader.join().unwrap_or_default(),
                    });
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(InvokeError::TimedOut(limit));
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
                Err(e) => return Err(spawn_error(program, e)),
            }
        }
    }
}

impl ToolInvoker for ProcessInvoker {
    fn invoke(&self, command: &[String]) -> Result<ToolOutput, InvokeError> {
        let (program, args) = command.split_first().ok_or(InvokeError::EmptyCommand)?;

        tracing::debug!("Running: {}", command.join(" "));

        match self.timeout {
            None => {
                let output = Command::new(program)
                    .args(args)
                    .output()
                    .map_err(|e| spawn_error(program, e))?;
                Ok(ToolOutput::from(output))
            }
            Some(limit) => self.invoke_with_deadline(program, args, limit),
        }
    }

    fn locate(&self) -> Result<(), InvokeError> {
        locate_tool(&self.tool_path).map(|_| ())
    }
}

/// Resolve the tool path to a launchable file.
///
/// A bare name is searched on `PATH`; anything with a directory component
/// must exist as a file.
pub fn locate_tool(tool_path: &Path) -> Result<PathBuf, InvokeError> {
    let not_found = || InvokeError::ToolNotFound {
        program: tool_path.to_string_lossy().to_string(),
    };

    if tool_path.components().nth(1).is_some() || tool_path.is_absolute() {
        if tool_path.is_file() {
            Ok(tool_path.to_path_buf())
        } else {
            Err(not_found())
        }
    } else {
        find_in_path(&tool_path.to_string_lossy()).ok_or_else(not_found)
    }
}

fn find_in_path(tool: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let full = dir.join(tool);
        if full.is_file() {
            return Some(full);
        }
        #[cfg(windows)]
        {
            let exe = dir.join(format!("{tool}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}

fn spawn_error(program: &str, source: io::Error) -> InvokeError {
    if source.kind() == io::ErrorKind::NotFound {
        InvokeError::ToolNotFound {
            program: program.to_string(),
        }
    } else {
        InvokeError::Spawn {
            program: program.to_string(),
            source,
        }
    }
}

/// Drain a child stream on a helper thread to avoid pipe deadlock while
/// polling for the deadline.
fn spawn_stream_reader<R: Read + Send + 'static>(
    stream: Option<R>,
) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoke_unknown_program_is_tool_not_found() {
        let invoker = ProcessInvoker::new("submux-test-no-such-tool");
        let command = vec!["submux-test-no-such-tool".to_string()];

        let err = invoker.invoke(&command).unwrap_err();
        assert!(matches!(err, InvokeError::ToolNotFound { .. }));
    }

    #[test]
    fn empty_command_is_rejected() {
        let invoker = ProcessInvoker::new("mkvmerge");
        let err = invoker.invoke(&[]).unwrap_err();
        assert!(matches!(err, InvokeError::EmptyCommand));
    }

    #[test]
    fn locate_missing_explicit_path_fails() {
        let err = locate_tool(Path::new("/no/such/dir/mkvmerge")).unwrap_err();
        assert!(matches!(err, InvokeError::ToolNotFound { .. }));
    }

    #[test]
    fn locate_missing_bare_name_fails() {
        let err = locate_tool(Path::new("submux-test-no-such-tool")).unwrap_err();
        assert!(matches!(err, InvokeError::ToolNotFound { .. }));
    }

    #[test]
    fn locate_explicit_file_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("mkvmerge");
        std::fs::write(&tool, b"").unwrap();

        assert!(locate_tool(&tool).is_ok());
    }
}
