//! Request/response correlation over the line transport.
//!
//! [`ProtocolClient`] owns the sequence counter for one process instance.
//! It performs the one-time configuration handshake and then correlates
//! every request with its response by `seq`, reading forward through the
//! stdout queue and discarding strictly stale frames. The child is assumed
//! to answer requests in the order it received them, so the loop never
//! pipelines or reorders.

use std::sync::mpsc::Receiver;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ClientError, LoadError};
use crate::process::ChildIo;
use crate::protocol::{self, DictionaryConfig, RequestBody, RequestFrame};
use crate::transport::LineTransport;

/// Log target for protocol exchanges.
const CLIENT_TARGET: &str = "chordwire_stdio::client";

/// Correlates requests and responses for one dictionary process instance.
#[derive(Debug)]
pub struct ProtocolClient {
    transport: LineTransport,
    stderr_faults: Option<Receiver<String>>,
    timeout: Option<Duration>,
    next_seq: i64,
}

impl ProtocolClient {
    /// Wraps the I/O endpoints of a freshly spawned process.
    ///
    /// The sequence counter starts at zero and the read timeout is unset
    /// until [`handshake`](Self::handshake) establishes it.
    #[must_use]
    pub fn new(io: ChildIo) -> Self {
        Self {
            transport: io.transport,
            stderr_faults: io.stderr_faults,
            timeout: None,
            next_seq: 0,
        }
    }

    /// Performs the one-time configuration handshake.
    ///
    /// Blocks without a deadline on the first stdout line; this message has
    /// no timeout because the declared maximum latency is part of it. On
    /// success the declared latency bounds every later read.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the process exits before the handshake
    /// or the configuration object fails validation.
    pub fn handshake(&mut self) -> Result<DictionaryConfig, LoadError> {
        let line = self
            .transport
            .recv_line(None)?
            .ok_or(ClientError::ProcessExited)?;

        let config = DictionaryConfig::parse(&line)?;
        self.set_timeout(config.max_latency);

        debug!(
            target: CLIENT_TARGET,
            longest_key = config.longest_key,
            max_latency = ?config.max_latency,
            supports_reverse = config.supports_reverse,
            "dictionary handshake complete"
        );

        Ok(config)
    }

    /// Sets the deadline applied to every post-handshake read.
    ///
    /// [`handshake`](Self::handshake) establishes this from the declared
    /// maximum latency; a session adopting an already-handshaken client
    /// re-applies it so the client and its configuration cannot diverge.
    pub(crate) const fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Sends one request and reads forward until its response arrives.
    ///
    /// Frames whose `seq` is lower than (or missing relative to) the sent
    /// request are stale and skipped; a frame from a `seq` not yet issued
    /// means the dictionary is in the future and is fatal.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] for process exit, timeout, malformed
    /// output, sequence violations, or (under the fatal stderr policy) a
    /// pending stderr line.
    pub fn communicate(&mut self, body: &RequestBody) -> Result<Value, ClientError> {
        self.check_stderr()?;

        let seq = self.next_seq;
        self.next_seq += 1;

        let line = serde_json::to_string(&RequestFrame { body, seq })
            .map_err(|err| ClientError::protocol(format!("failed to serialise request: {err}")))?;
        self.transport.send_line(&line)?;

        loop {
            let text = self
                .transport
                .recv_line(self.timeout)?
                .ok_or(ClientError::ProcessExited)?;

            let frame: Value = serde_json::from_str(&text).map_err(|err| {
                ClientError::protocol(format!("dictionary pushed invalid JSON ({err}): {text}"))
            })?;

            match protocol::frame_seq(&frame)? {
                Some(got) if got == seq => return Ok(frame),
                Some(got) if got > seq => {
                    return Err(ClientError::protocol(format!(
                        "the dictionary is in the future: got seq {got}, expected {seq}"
                    )));
                }
                stale => {
                    warn!(
                        target: CLIENT_TARGET,
                        expected = seq,
                        received = ?stale,
                        "skipping stale response frame"
                    );
                }
            }
        }
    }

    /// Surfaces the first pending stderr line under the fatal policy.
    fn check_stderr(&mut self) -> Result<(), ClientError> {
        let Some(faults) = &self.stderr_faults else {
            return Ok(());
        };
        match faults.try_recv() {
            Ok(line) => Err(ClientError::Child { line }),
            Err(_) => Ok(()),
        }
    }
}
