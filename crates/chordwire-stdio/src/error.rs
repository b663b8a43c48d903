//! Error types for the stdio dictionary client.
//!
//! All errors use `thiserror`-derived enums with structured context. I/O
//! errors are wrapped in `Arc` to satisfy the `result_large_err` Clippy
//! lint and keep the enums cheaply cloneable.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while spawning the dictionary process.
#[derive(Debug, Clone, Error)]
pub enum SpawnError {
    /// The dictionary executable was not found.
    #[error("dictionary executable not found: {command}")]
    BinaryNotFound {
        /// The command that was not found.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The process could not be started.
    #[error("failed to spawn dictionary process: {message}")]
    SpawnFailed {
        /// Description of the spawn failure.
        message: String,
        /// The underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
}

/// Fatal errors raised while exchanging requests with a live process.
///
/// Every variant poisons the dictionary: the guard logs it, moves the
/// instance to `Failed`, and returns the operation's safe default.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The process wrote output that violates the wire protocol.
    #[error("protocol violation: {message}")]
    Protocol {
        /// Description of the violation.
        message: String,
    },

    /// End of stream was observed on the process's stdout.
    #[error("dictionary process exited early")]
    ProcessExited,

    /// No correlated response arrived within the declared maximum latency.
    #[error("dictionary did not answer within {waited:?}")]
    Timeout {
        /// How long the read waited before giving up.
        waited: Duration,
    },

    /// An I/O error occurred while writing to the process.
    #[error("I/O error communicating with dictionary: {source}")]
    Io {
        /// The underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The process reported an error line on stderr (fatal stderr policy).
    #[error("dictionary reported an error: {line}")]
    Child {
        /// The stderr line that was surfaced.
        line: String,
    },
}

impl ClientError {
    /// Builds a protocol-violation error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

impl From<io::Error> for ClientError {
    fn from(source: io::Error) -> Self {
        Self::Io {
            source: Arc::new(source),
        }
    }
}

/// Validation failures in the one-time configuration handshake.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// The first line was not a valid configuration object.
    #[error("handshake is not a valid configuration object: {0}")]
    Invalid(#[source] serde_json::Error),

    /// `longest-key` was missing, zero, or negative.
    #[error("'longest-key' is not a valid value: {value}")]
    LongestKey {
        /// The rejected value.
        value: i64,
    },

    /// `max-latency-ms` was zero or negative.
    #[error("the maximum latency is not a valid value: {value}")]
    MaxLatency {
        /// The rejected value.
        value: f64,
    },
}

/// Errors raised while loading a dictionary.
///
/// Always propagated to the `load` caller; the dictionary never becomes
/// active when any of these occur.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The process could not be spawned.
    #[error("failed to start dictionary process")]
    Spawn(#[from] SpawnError),

    /// The configuration handshake was malformed.
    #[error("invalid dictionary handshake")]
    Handshake(#[from] HandshakeError),

    /// The process exited or misbehaved before the handshake completed.
    #[error("dictionary misbehaved during handshake")]
    Wire(#[from] ClientError),
}
