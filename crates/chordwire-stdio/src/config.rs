//! Configuration for spawning dictionary processes.

use std::path::PathBuf;

/// Disposition of lines the dictionary process writes to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StderrPolicy {
    /// Forward each stderr line to the logging facility and carry on.
    #[default]
    Log,
    /// Surface the first pending stderr line as a fatal error on the next
    /// request.
    Fatal,
}

/// Configuration for spawning a dictionary process.
///
/// The executable path itself is supplied to `load`; this struct carries the
/// ambient knobs that stay fixed across reloads.
#[derive(Debug, Clone, Default)]
pub struct SpawnConfig {
    /// Working directory for the spawned process.
    pub working_dir: Option<PathBuf>,
    /// How stderr output from the process is treated.
    pub stderr_policy: StderrPolicy,
}

impl SpawnConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom working directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Sets the stderr disposition.
    #[must_use]
    pub const fn with_stderr_policy(mut self, policy: StderrPolicy) -> Self {
        self.stderr_policy = policy;
        self
    }
}
