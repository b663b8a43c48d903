//! Dictionary process lifecycle management.
//!
//! [`ProcessSupervisor`] owns at most one child process at a time. Starting
//! a new instance terminates the previous one first, so a reload can never
//! leak a zombie. The spawned child's stdout and stderr are immediately
//! handed to background [`reader`](crate::reader) threads; the caller gets
//! back a [`ChildIo`] bundle with the write end and the stdout line queue.

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};

use tracing::{debug, warn};

use crate::config::SpawnConfig;
use crate::error::SpawnError;
use crate::reader::{spawn_line_reader, spawn_stderr_drain};
use crate::transport::LineTransport;

/// Log target for process lifecycle operations.
const PROCESS_TARGET: &str = "chordwire_stdio::process";

/// I/O endpoints of a freshly spawned dictionary process.
#[derive(Debug)]
pub struct ChildIo {
    /// Line transport over the child's stdin and stdout.
    pub transport: LineTransport,
    /// Pending stderr lines, present under the fatal stderr policy.
    pub stderr_faults: Option<Receiver<String>>,
}

/// Owns and replaces the single dictionary child process.
#[derive(Debug, Default)]
pub struct ProcessSupervisor {
    child: Option<Child>,
}

impl ProcessSupervisor {
    /// Creates a supervisor owning no process.
    #[must_use]
    pub const fn new() -> Self {
        Self { child: None }
    }

    /// Whether a child process is currently owned.
    #[must_use]
    pub const fn has_child(&self) -> bool {
        self.child.is_some()
    }

    /// Spawns the dictionary executable, replacing any prior instance.
    ///
    /// The executable is run with no arguments; its three standard streams
    /// are piped. Reader threads for stdout and stderr are started before
    /// this returns, so the child can never block on a full output pipe.
    ///
    /// # Errors
    ///
    /// Returns [`SpawnError::BinaryNotFound`] when the executable does not
    /// exist and [`SpawnError::SpawnFailed`] for any other spawn or pipe
    /// wiring failure.
    pub fn start(&mut self, path: &Path, config: &SpawnConfig) -> Result<ChildIo, SpawnError> {
        self.terminate();

        debug!(
            target: PROCESS_TARGET,
            command = %path.display(),
            "spawning dictionary process"
        );

        let mut command = Command::new(path);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &config.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                SpawnError::BinaryNotFound {
                    command: path.display().to_string(),
                    source: Arc::new(err),
                }
            } else {
                SpawnError::SpawnFailed {
                    message: format!("failed to start {}", path.display()),
                    source: Arc::new(err),
                }
            }
        })?;

        let stdin = take_stream(child.stdin.take(), "stdin")?;
        let stdout = take_stream(child.stdout.take(), "stdout")?;
        let stderr = take_stream(child.stderr.take(), "stderr")?;

        let (lines_tx, lines_rx) = channel();
        drop(spawn_line_reader(stdout, lines_tx));
        let (_, stderr_faults) = spawn_stderr_drain(stderr, config.stderr_policy);

        debug!(
            target: PROCESS_TARGET,
            command = %path.display(),
            pid = child.id(),
            "dictionary process spawned"
        );

        self.child = Some(child);

        Ok(ChildIo {
            transport: LineTransport::new(Box::new(stdin), lines_rx),
            stderr_faults,
        })
    }

    /// Terminates the owned child, if any. Best-effort and non-blocking:
    /// the child is killed and reaped once with `try_wait`; a child that
    /// needs longer to die is left to the OS.
    pub fn terminate(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        let pid = child.id();
        if let Err(err) = child.kill() {
            warn!(
                target: PROCESS_TARGET,
                pid,
                error = %err,
                "failed to kill dictionary process"
            );
        }
        match child.try_wait() {
            Ok(status) => {
                debug!(target: PROCESS_TARGET, pid, ?status, "dictionary process terminated");
            }
            Err(err) => {
                warn!(
                    target: PROCESS_TARGET,
                    pid,
                    error = %err,
                    "failed to reap dictionary process"
                );
            }
        }
    }
}

impl Drop for ProcessSupervisor {
    fn drop(&mut self) {
        self.terminate();
    }
}

fn take_stream<T>(stream: Option<T>, name: &str) -> Result<T, SpawnError> {
    stream.ok_or_else(|| SpawnError::SpawnFailed {
        message: format!("failed to capture {name}"),
        source: Arc::new(std::io::Error::other(format!("no {name}"))),
    })
}
