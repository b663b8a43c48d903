//! Line transport over a process's stdin pipe and stdout queue.
//!
//! The write side is the child's stdin; the read side is the channel fed by
//! the stdout [`LineReader`](crate::reader) thread, so reads can be bounded
//! by a timeout without non-blocking pipe tricks.

use std::fmt;
use std::io::Write;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::error::ClientError;
use crate::reader::LineEvent;

/// Sends request lines to and receives response lines from a dictionary
/// process.
pub struct LineTransport {
    writer: Box<dyn Write + Send>,
    lines: Receiver<LineEvent>,
}

impl LineTransport {
    /// Creates a transport from a write end and a line-event queue.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, lines: Receiver<LineEvent>) -> Self {
        Self { writer, lines }
    }

    /// Writes one line, appending a newline and flushing.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] when the pipe is broken or the flush
    /// fails.
    pub fn send_line(&mut self, line: &str) -> Result<(), ClientError> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Reads the next line, blocking up to `timeout` (or indefinitely when
    /// `None`).
    ///
    /// `Ok(None)` means end of stream: either the reader thread delivered
    /// its [`LineEvent::Eof`] sentinel or the queue disconnected after
    /// doing so.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Timeout`] when no line arrives in time.
    pub fn recv_line(&mut self, timeout: Option<Duration>) -> Result<Option<String>, ClientError> {
        let event = match timeout {
            None => self.lines.recv().ok(),
            Some(bound) => match self.lines.recv_timeout(bound) {
                Ok(event) => Some(event),
                Err(RecvTimeoutError::Timeout) => {
                    return Err(ClientError::Timeout { waited: bound });
                }
                Err(RecvTimeoutError::Disconnected) => None,
            },
        };

        match event {
            Some(LineEvent::Line(text)) => Ok(Some(text)),
            Some(LineEvent::Eof) | None => Ok(None),
        }
    }
}

impl fmt::Debug for LineTransport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("LineTransport")
    }
}
