//! Wire protocol types for the newline-delimited JSON dictionary exchange.
//!
//! The protocol is line-oriented: the client writes one request object per
//! line to the process's stdin and reads one JSON object per line from its
//! stdout. The very first stdout line is the configuration handshake; every
//! later line is a response frame carrying a `seq` correlation number.
//! Field names on the wire are kebab-case.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use chordwire_core::StrokeKey;

use crate::error::{ClientError, HandshakeError};

/// Wire field carrying reverse-lookup results in a response frame.
pub const REVERSE_FIELD: &str = "reverse-translation";

/// Body of a request sent to the dictionary process.
///
/// Serialises externally tagged, so the variant name becomes the wire field:
/// `{"translate": ["T"]}` or `{"untranslate": "the"}`.
#[derive(Debug, Clone, Serialize)]
pub enum RequestBody {
    /// Forward lookup of a stroke sequence.
    #[serde(rename = "translate")]
    Translate(StrokeKey),
    /// Reverse lookup of a translation text.
    #[serde(rename = "untranslate")]
    Untranslate(String),
}

/// A request body paired with its assigned sequence number.
#[derive(Debug, Serialize)]
pub struct RequestFrame<'a> {
    /// The request payload, flattened into the frame object.
    #[serde(flatten)]
    pub body: &'a RequestBody,
    /// Correlation number, strictly increasing per process instance.
    pub seq: i64,
}

/// Raw handshake object as it appears on the wire.
#[derive(Debug, Deserialize)]
struct RawHandshake {
    #[serde(rename = "longest-key")]
    longest_key: i64,
    #[serde(rename = "max-latency-ms", default)]
    max_latency_ms: Option<f64>,
    #[serde(default)]
    untranslate: bool,
}

/// Protocol parameters established by the configuration handshake.
///
/// Fixed for the lifetime of a process instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DictionaryConfig {
    /// Maximum stroke-sequence length the dictionary can match.
    pub longest_key: usize,
    /// Upper bound for every post-handshake read, or `None` to block
    /// indefinitely.
    pub max_latency: Option<Duration>,
    /// Whether the process answers `untranslate` requests.
    pub supports_reverse: bool,
}

impl DictionaryConfig {
    /// Parses and validates the handshake line.
    ///
    /// # Errors
    ///
    /// Returns a [`HandshakeError`] for malformed JSON, a missing or
    /// non-positive `longest-key`, or a non-positive `max-latency-ms`.
    pub fn parse(line: &str) -> Result<Self, HandshakeError> {
        let raw: RawHandshake = serde_json::from_str(line).map_err(HandshakeError::Invalid)?;

        let longest_key = usize::try_from(raw.longest_key)
            .ok()
            .filter(|&n| n > 0)
            .ok_or(HandshakeError::LongestKey {
                value: raw.longest_key,
            })?;

        let max_latency = match raw.max_latency_ms {
            None => None,
            Some(ms) if ms > 0.0 => {
                #[expect(
                    clippy::float_arithmetic,
                    reason = "the wire declares latency in fractional milliseconds"
                )]
                let seconds = ms / 1000.0;
                // A latency too large for Duration is as unusable as a
                // negative one; both fail the handshake rather than the host.
                let bound = Duration::try_from_secs_f64(seconds)
                    .map_err(|_| HandshakeError::MaxLatency { value: ms })?;
                Some(bound)
            }
            Some(ms) => return Err(HandshakeError::MaxLatency { value: ms }),
        };

        Ok(Self {
            longest_key,
            max_latency,
            supports_reverse: raw.untranslate,
        })
    }
}

/// Extracts the sequence number from a response frame.
///
/// A frame without a `seq` field is treated as stale and reports `None`
/// (the child double-emitted or wrote junk the correlation loop should
/// skip); a `seq` that is present but not an integer is a protocol
/// violation.
///
/// # Errors
///
/// Returns [`ClientError::Protocol`] when `seq` has the wrong type.
pub fn frame_seq(frame: &Value) -> Result<Option<i64>, ClientError> {
    match frame.get("seq") {
        None => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or_else(|| {
            ClientError::protocol(format!("expected 'seq' to be an integer, got {value}"))
        }),
    }
}

/// Extracts the forward-lookup result from a response frame.
///
/// An absent or null `translation` is the normal miss outcome and reports
/// `None`.
///
/// # Errors
///
/// Returns [`ClientError::Protocol`] when `translation` is neither a
/// string nor null.
pub fn translation(frame: &Value) -> Result<Option<String>, ClientError> {
    match frame.get("translation") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(ClientError::protocol(format!(
            "expected 'translation' to be a string or null, got {other}"
        ))),
    }
}

/// Extracts the reverse-lookup result from a response frame.
///
/// An absent field reports an empty set. The field must otherwise be a
/// list of stroke lists; each inner element a string.
///
/// # Errors
///
/// Returns [`ClientError::Protocol`] when the field has the wrong shape.
pub fn reverse_translations(frame: &Value) -> Result<BTreeSet<StrokeKey>, ClientError> {
    match frame.get(REVERSE_FIELD) {
        None => Ok(BTreeSet::new()),
        Some(value) => serde_json::from_value::<Vec<StrokeKey>>(value.clone())
            .map(|keys| keys.into_iter().collect())
            .map_err(|err| {
                ClientError::protocol(format!(
                    "expected '{REVERSE_FIELD}' to be a list of stroke lists: {err}"
                ))
            }),
    }
}
