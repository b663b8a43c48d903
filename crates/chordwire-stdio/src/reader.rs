//! Background line readers draining process output streams.
//!
//! Each live dictionary process owns two reader threads: one forwarding
//! stdout lines into a channel the control thread consumes, one draining
//! stderr. All blocking happens on the consumer side of the channel; the
//! threads themselves only ever block on the pipe they own.

use std::io::{BufRead, BufReader, Read};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};

use tracing::error;

use crate::config::StderrPolicy;

/// Log target for reader threads.
const READER_TARGET: &str = "chordwire_stdio::reader";

/// One event produced by a line reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// A complete line with its trailing newline stripped.
    Line(String),
    /// The stream closed; no further events follow.
    Eof,
}

/// Spawns a thread that drains `stream` line-by-line into `sender`.
///
/// Exactly one [`LineEvent::Eof`] is sent when the stream closes; a read
/// error is indistinguishable from process exit at this layer and maps to
/// the same sentinel. The thread stops early if the consumer hung up.
pub fn spawn_line_reader<R>(stream: R, sender: Sender<LineEvent>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            let Ok(text) = line else { break };
            if sender.send(LineEvent::Line(text)).is_err() {
                return;
            }
        }
        let _ = sender.send(LineEvent::Eof);
    })
}

/// Spawns a thread that drains the process's stderr.
///
/// Under [`StderrPolicy::Log`] each line is forwarded to the logging
/// facility and the returned receiver is `None`. Under
/// [`StderrPolicy::Fatal`] lines are additionally queued so the client can
/// surface the first pending one as a fatal error on the next request.
pub fn spawn_stderr_drain<R>(
    stream: R,
    policy: StderrPolicy,
) -> (JoinHandle<()>, Option<Receiver<String>>)
where
    R: Read + Send + 'static,
{
    let (faults_tx, faults_rx) = match policy {
        StderrPolicy::Log => (None, None),
        StderrPolicy::Fatal => {
            let (tx, rx) = channel();
            (Some(tx), Some(rx))
        }
    };

    let handle = thread::spawn(move || {
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            let Ok(text) = line else { break };
            error!(target: READER_TARGET, line = %text, "dictionary stderr");
            if let Some(tx) = &faults_tx {
                if tx.send(text).is_err() {
                    return;
                }
            }
        }
    });

    (handle, faults_rx)
}
