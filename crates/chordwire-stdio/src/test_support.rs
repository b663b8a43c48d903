//! Shared fixtures for in-process unit tests.
//!
//! Provides a [`LineTransport`] wired to an inspectable in-memory write
//! end and a hand-fed line queue, so protocol and guard behaviour can be
//! exercised without spawning real processes.

use std::io::Write;
use std::sync::mpsc::{Sender, channel};
use std::sync::{Arc, Mutex};

use crate::reader::LineEvent;
use crate::transport::LineTransport;

/// Write end that exposes its buffer for assertions.
#[derive(Clone, Default)]
pub(crate) struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    /// Returns everything written so far as UTF-8 text.
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().expect("poisoned").clone()).expect("invalid utf8")
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Builds a transport whose reads are fed by the returned sender and whose
/// writes land in the returned buffer.
pub(crate) fn scripted_transport() -> (LineTransport, SharedBuf, Sender<LineEvent>) {
    let buffer = SharedBuf::default();
    let (sender, receiver) = channel();
    let transport = LineTransport::new(Box::new(buffer.clone()), receiver);
    (transport, buffer, sender)
}

/// Queues one response line on a scripted transport.
pub(crate) fn feed_line(sender: &Sender<LineEvent>, line: &str) {
    sender
        .send(LineEvent::Line(line.into()))
        .expect("test queue hung up");
}
