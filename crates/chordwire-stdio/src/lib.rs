//! Out-of-process steno dictionary client.
//!
//! The crate spawns an external dictionary program and speaks a
//! newline-delimited JSON request/response protocol with it over the
//! child's standard streams. Lookups are exposed through
//! [`StdioDictionary`], which implements the
//! [`StenoDictionary`](chordwire_core::StenoDictionary) contract and
//! tolerates process crashes, malformed output, and slow responses
//! without ever raising them out of a lookup call.
//!
//! # Architecture
//!
//! - [`reader`]: background threads draining the child's output streams
//!   into blocking queues, with a terminal sentinel on close.
//! - [`process`]: spawns and replaces the single child process instance.
//! - [`transport`]: line-oriented writes plus timeout-bounded queue reads.
//! - [`protocol`]: wire message types, the configuration handshake, and
//!   typed response-field extraction.
//! - [`client`]: sequence-number assignment and response correlation.
//! - [`dictionary`]: the public facade and the degrade-gracefully error
//!   guard around every lookup.
//!
//! # Wire protocol
//!
//! The child announces itself with one configuration line, e.g.
//! `{"longest-key": 2, "max-latency-ms": 500, "untranslate": true}`, then
//! answers `{"translate": [...], "seq": n}` and
//! `{"untranslate": "...", "seq": n}` requests with frames echoing the
//! same `seq`.

pub mod client;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod process;
pub mod protocol;
pub mod reader;
pub mod state;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use self::client::ProtocolClient;
pub use self::config::{SpawnConfig, StderrPolicy};
pub use self::dictionary::StdioDictionary;
pub use self::error::{ClientError, HandshakeError, LoadError, SpawnError};
pub use self::process::{ChildIo, ProcessSupervisor};
pub use self::protocol::{DictionaryConfig, RequestBody};
pub use self::state::DictionaryState;
