use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::instrument;
use wait_timeout::ChildExt;

/// Output captured from a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub stdout: String,
    pub stderr: String,
}

/// Runs external commands to completion, optionally bounded by a timeout.
///
/// Output is spooled into anonymous temporary files rather than pipes, so a
/// chatty child can never fill a pipe buffer and stall while we wait on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Runner {
    timeout: Option<Duration>,
}

impl Runner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Run `command`, blocking until it exits (or times out and is killed).
    ///
    /// # Errors
    /// - [`ErrorKind::Spawn`] if the program could not be started.
    /// - [`ErrorKind::Timeout`] if the configured timeout elapsed.
    /// - [`ErrorKind::Failed`] on a non-zero exit code, carrying stderr.
    /// - [`ErrorKind::Terminated`] if the process was killed by a signal.
    #[instrument(skip_all, fields(program = ?command.get_program()))]
    pub fn run(&self, command: &mut Command) -> Result<Captured> {
        let program = PathBuf::from(command.get_program());
        let mut stdout = tempfile::tempfile().or_raise(|| ErrorKind::Io)?;
        let mut stderr = tempfile::tempfile().or_raise(|| ErrorKind::Io)?;
        command
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout.try_clone().or_raise(|| ErrorKind::Io)?))
            .stderr(Stdio::from(stderr.try_clone().or_raise(|| ErrorKind::Io)?));
        tracing::trace!(args = ?command.get_args().collect::<Vec<_>>(), "Spawning external tool");
        let mut child = command.spawn().or_raise(|| ErrorKind::Spawn(program.clone()))?;

        let status = match self.timeout {
            None => child.wait().or_raise(|| ErrorKind::Io)?,
            Some(limit) => match child.wait_timeout(limit).or_raise(|| ErrorKind::Io)? {
                Some(status) => status,
                None => {
                    tracing::warn!(program = %program.display(), timeout = ?limit, "External tool timed out; killing it");
                    _ = child.kill();
                    // Reap, otherwise the killed child lingers as a zombie.
                    _ = child.wait();
                    exn::bail!(ErrorKind::Timeout(limit));
                },
            },
        };

        let captured = Captured {
            stdout: read_back(&mut stdout)?,
            stderr: read_back(&mut stderr)?,
        };
        if status.success() {
            return Ok(captured);
        }
        match status.code() {
            Some(code) => {
                let stderr = match captured.stderr.trim() {
                    "" => "no diagnostic output".to_string(),
                    s => s.to_string(),
                };
                exn::bail!(ErrorKind::Failed { code, stderr })
            },
            None => exn::bail!(ErrorKind::Terminated),
        }
    }
}

fn read_back(file: &mut File) -> Result<String> {
    file.seek(SeekFrom::Start(0)).or_raise(|| ErrorKind::Io)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer).or_raise(|| ErrorKind::Io)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.args(["-c", script]);
        command
    }

    #[test]
    fn test_captures_output() {
        let captured = Runner::default().run(&mut sh("echo out; echo err >&2")).unwrap();
        assert_eq!(captured.stdout, "out\n");
        assert_eq!(captured.stderr, "err\n");
    }

    #[test]
    fn test_non_zero_exit() {
        let err = Runner::default().run(&mut sh("echo 'bad magic number' >&2; exit 3")).unwrap_err();
        assert_eq!(*err, ErrorKind::Failed { code: 3, stderr: "bad magic number".to_string() });
    }

    #[test]
    fn test_non_zero_exit_without_stderr() {
        let err = Runner::default().run(&mut sh("exit 1")).unwrap_err();
        assert_eq!(*err, ErrorKind::Failed { code: 1, stderr: "no diagnostic output".to_string() });
    }

    #[test]
    fn test_timeout_kills_process() {
        let runner = Runner::new(Some(Duration::from_millis(100)));
        let started = std::time::Instant::now();
        let err = runner.run(&mut sh("sleep 10")).unwrap_err();
        assert_eq!(*err, ErrorKind::Timeout(Duration::from_millis(100)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_within_timeout() {
        let runner = Runner::new(Some(Duration::from_secs(30)));
        assert!(runner.run(&mut sh("exit 0")).is_ok());
    }

    #[test]
    fn test_spawn_failure() {
        let mut command = Command::new("/definitely/not/a/real/decompiler");
        let err = Runner::default().run(&mut command).unwrap_err();
        assert_eq!(*err, ErrorKind::Spawn(PathBuf::from("/definitely/not/a/real/decompiler")));
    }

    #[test]
    fn test_large_output_does_not_stall() {
        // Far more than a pipe buffer's worth of output.
        let runner = Runner::new(Some(Duration::from_secs(30)));
        let captured = runner.run(&mut sh("i=0; while [ $i -lt 20000 ]; do echo 0123456789; i=$((i+1)); done")).unwrap();
        assert_eq!(captured.stdout.len(), 20000 * 11);
    }
}
