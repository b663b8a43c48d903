//! The public dictionary facade and its error guard.
//!
//! [`StdioDictionary`] implements [`StenoDictionary`] by delegating every
//! lookup to the protocol client through a single guarded path. The guard
//! realises the two error policies: load errors propagate to the caller,
//! while lookup errors are logged, flip the instance to `Failed`, and
//! degrade the result to the operation's safe default. A key miss is never
//! a failure; it travels inside the operation's success value so the guard
//! cannot confuse it with a fault.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::error;

use chordwire_core::{DictionaryError, StenoDictionary, StrokeKey};

use crate::client::ProtocolClient;
use crate::config::SpawnConfig;
use crate::error::{ClientError, LoadError};
use crate::process::ProcessSupervisor;
use crate::protocol::{self, DictionaryConfig, RequestBody};
use crate::state::DictionaryState;

/// Log target for dictionary facade operations.
const DICTIONARY_TARGET: &str = "chordwire_stdio::dictionary";

/// One loaded process instance: its client and handshake parameters.
///
/// Kept alive even after a fatal error so the child and its reader threads
/// survive until the next `load` replaces them.
#[derive(Debug)]
struct Session {
    client: ProtocolClient,
    config: DictionaryConfig,
}

impl Session {
    /// Adopts a client under the given handshake parameters.
    ///
    /// Re-applies the declared latency as the client's read deadline; the
    /// session is the only place the two are paired, so they cannot
    /// disagree.
    const fn new(mut client: ProtocolClient, config: DictionaryConfig) -> Self {
        client.set_timeout(config.max_latency);
        Self { client, config }
    }

    /// Forward lookup, short-circuiting keys the dictionary can never
    /// match. `Ok(None)` is the miss outcome.
    fn translate(&mut self, key: &StrokeKey) -> Result<Option<String>, ClientError> {
        if key.len() > self.config.longest_key {
            return Ok(None);
        }
        let frame = self
            .client
            .communicate(&RequestBody::Translate(key.clone()))?;
        protocol::translation(&frame)
    }

    /// Reverse lookup. Empty when the handshake declared no support.
    fn untranslate(&mut self, text: &str) -> Result<BTreeSet<StrokeKey>, ClientError> {
        if !self.config.supports_reverse {
            return Ok(BTreeSet::new());
        }
        let frame = self
            .client
            .communicate(&RequestBody::Untranslate(text.to_owned()))?;
        protocol::reverse_translations(&frame)
    }
}

/// A read-only steno dictionary served by an external process.
///
/// The process is spawned on `load` and speaks the newline-delimited JSON
/// protocol described in [`protocol`](crate::protocol). A misbehaving
/// child degrades the dictionary to empty results instead of surfacing
/// errors out of lookup calls; `load` again to recover.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use chordwire_core::{StenoDictionary, StrokeKey};
/// use chordwire_stdio::StdioDictionary;
///
/// let mut dictionary = StdioDictionary::new();
/// dictionary.load(Path::new("./my-dictionary"))?;
///
/// let key: StrokeKey = ["T"].into_iter().collect();
/// assert_eq!(dictionary.lookup_or(&key, "?"), "the");
/// # Ok::<(), chordwire_core::LoadError>(())
/// ```
#[derive(Debug, Default)]
pub struct StdioDictionary {
    spawn_config: SpawnConfig,
    supervisor: ProcessSupervisor,
    session: Option<Session>,
    state: DictionaryState,
}

impl StdioDictionary {
    /// Creates an unloaded dictionary with the default spawn configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unloaded dictionary with a custom spawn configuration.
    #[must_use]
    pub fn with_config(spawn_config: SpawnConfig) -> Self {
        Self {
            spawn_config,
            ..Self::default()
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> DictionaryState {
        self.state
    }

    fn load_inner(&mut self, path: &Path) -> Result<(), LoadError> {
        // A failed load must leave the instance unusable, not half-active.
        self.state = DictionaryState::Uninitialized;
        self.session = None;

        let io = self.supervisor.start(path, &self.spawn_config)?;
        let mut client = ProtocolClient::new(io);
        let config = client.handshake()?;

        self.session = Some(Session::new(client, config));
        self.state = DictionaryState::Active;
        Ok(())
    }

    /// Runs a lookup operation under the absorb-and-log policy.
    ///
    /// Short-circuits to the safe default with no I/O unless the instance
    /// is `Active`. A fatal error is logged, poisons the instance, and
    /// yields the safe default; the process itself keeps running until the
    /// next `load` replaces it.
    fn run_guarded<R>(
        &mut self,
        safe_default: impl FnOnce() -> R,
        operation: impl FnOnce(&mut Session) -> Result<R, ClientError>,
    ) -> R {
        if !self.state.is_active() {
            return safe_default();
        }
        let Some(session) = self.session.as_mut() else {
            return safe_default();
        };

        match operation(session) {
            Ok(value) => value,
            Err(fault) => {
                error!(
                    target: DICTIONARY_TARGET,
                    error = %fault,
                    "lookup failed; dictionary disabled until reload"
                );
                self.state = DictionaryState::Failed;
                safe_default()
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn with_session(client: ProtocolClient, config: DictionaryConfig) -> Self {
        Self {
            spawn_config: SpawnConfig::default(),
            supervisor: ProcessSupervisor::new(),
            session: Some(Session::new(client, config)),
            state: DictionaryState::Active,
        }
    }
}

impl StenoDictionary for StdioDictionary {
    fn load(&mut self, path: &Path) -> Result<(), chordwire_core::LoadError> {
        self.load_inner(path).map_err(|err| {
            chordwire_core::LoadError::with_source(
                format!("could not load stdio dictionary {}", path.display()),
                err,
            )
        })
    }

    fn longest_key(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |session| session.config.longest_key)
    }

    fn is_readonly(&self) -> bool {
        true
    }

    fn contains(&mut self, key: &StrokeKey) -> bool {
        self.run_guarded(
            || false,
            |session| Ok(session.translate(key)?.is_some()),
        )
    }

    fn lookup(&mut self, key: &StrokeKey) -> Result<String, DictionaryError> {
        self.run_guarded(
            || Err(DictionaryError::NotFound),
            |session| Ok(session.translate(key)?.ok_or(DictionaryError::NotFound)),
        )
    }

    fn lookup_or(&mut self, key: &StrokeKey, fallback: &str) -> String {
        self.run_guarded(
            || fallback.to_owned(),
            |session| {
                Ok(session
                    .translate(key)?
                    .unwrap_or_else(|| fallback.to_owned()))
            },
        )
    }

    fn reverse_lookup(&mut self, text: &str) -> BTreeSet<StrokeKey> {
        self.run_guarded(BTreeSet::new, |session| session.untranslate(text))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::Sender;
    use std::time::Duration;

    use rstest::rstest;

    use super::*;
    use crate::process::ChildIo;
    use crate::reader::LineEvent;
    use crate::test_support::{SharedBuf, feed_line, scripted_transport};

    fn active_dictionary(config: DictionaryConfig) -> (StdioDictionary, SharedBuf, Sender<LineEvent>) {
        let (transport, buffer, sender) = scripted_transport();
        let client = ProtocolClient::new(ChildIo {
            transport,
            stderr_faults: None,
        });
        (StdioDictionary::with_session(client, config), buffer, sender)
    }

    fn forward_only(longest_key: usize) -> DictionaryConfig {
        DictionaryConfig {
            longest_key,
            max_latency: None,
            supports_reverse: false,
        }
    }

    fn key(strokes: &[&str]) -> StrokeKey {
        strokes.iter().copied().collect()
    }

    #[rstest]
    fn unloaded_dictionary_answers_safe_defaults_without_io() {
        let mut dictionary = StdioDictionary::new();

        assert_eq!(dictionary.state(), DictionaryState::Uninitialized);
        assert!(!dictionary.contains(&key(&["T"])));
        assert_eq!(
            dictionary.lookup(&key(&["T"])),
            Err(DictionaryError::NotFound)
        );
        assert_eq!(dictionary.lookup_or(&key(&["T"]), "fallback"), "fallback");
        assert!(dictionary.reverse_lookup("the").is_empty());
        assert_eq!(dictionary.longest_key(), 0);
    }

    #[rstest]
    fn lookup_returns_translation_for_matching_seq() {
        let (mut dictionary, _buffer, sender) = active_dictionary(forward_only(2));
        feed_line(&sender, r#"{"seq": 0, "translation": "the"}"#);

        assert_eq!(dictionary.lookup(&key(&["T"])), Ok("the".into()));
        assert_eq!(dictionary.state(), DictionaryState::Active);
    }

    #[rstest]
    fn over_long_keys_miss_without_io() {
        let (mut dictionary, buffer, _sender) = active_dictionary(forward_only(2));
        let long = key(&["T", "E", "S"]);

        assert!(!dictionary.contains(&long));
        assert_eq!(dictionary.lookup(&long), Err(DictionaryError::NotFound));
        assert_eq!(dictionary.lookup_or(&long, "fallback"), "fallback");

        assert_eq!(buffer.contents(), "");
        assert_eq!(dictionary.state(), DictionaryState::Active);
    }

    #[rstest]
    fn null_translation_is_a_miss_not_a_failure() {
        let (mut dictionary, _buffer, sender) = active_dictionary(forward_only(2));
        feed_line(&sender, r#"{"seq": 0, "translation": null}"#);
        feed_line(&sender, r#"{"seq": 1, "translation": "the"}"#);

        assert_eq!(
            dictionary.lookup(&key(&["-T"])),
            Err(DictionaryError::NotFound)
        );
        // The miss left the instance active; the next lookup still works.
        assert_eq!(dictionary.lookup(&key(&["T"])), Ok("the".into()));
    }

    #[rstest]
    fn contains_issues_one_request_per_call() {
        let (mut dictionary, buffer, sender) = active_dictionary(forward_only(2));
        feed_line(&sender, r#"{"seq": 0, "translation": "the"}"#);
        feed_line(&sender, r#"{"seq": 1, "translation": "the"}"#);

        assert!(dictionary.contains(&key(&["T"])));
        assert!(dictionary.contains(&key(&["T"])));

        assert_eq!(
            buffer.contents(),
            "{\"translate\":[\"T\"],\"seq\":0}\n{\"translate\":[\"T\"],\"seq\":1}\n"
        );
    }

    #[rstest]
    fn process_exit_poisons_the_instance() {
        let (mut dictionary, buffer, sender) = active_dictionary(forward_only(2));
        sender.send(LineEvent::Eof).expect("send failed");

        assert_eq!(dictionary.lookup_or(&key(&["T"]), "fallback"), "fallback");
        assert_eq!(dictionary.state(), DictionaryState::Failed);

        // Subsequent lookups short-circuit with zero additional I/O.
        let written = buffer.contents();
        assert!(!dictionary.contains(&key(&["T"])));
        assert_eq!(dictionary.lookup(&key(&["T"])), Err(DictionaryError::NotFound));
        assert_eq!(buffer.contents(), written);
    }

    #[rstest]
    fn future_sequence_number_poisons_the_instance() {
        let (mut dictionary, _buffer, sender) = active_dictionary(forward_only(2));
        feed_line(&sender, r#"{"seq": 5, "translation": "the"}"#);

        assert!(!dictionary.contains(&key(&["T"])));
        assert_eq!(dictionary.state(), DictionaryState::Failed);
    }

    #[rstest]
    fn timeout_poisons_the_instance() {
        let config = DictionaryConfig {
            longest_key: 2,
            max_latency: Some(Duration::from_millis(20)),
            supports_reverse: false,
        };
        let (mut dictionary, _buffer, _sender) = active_dictionary(config);

        assert_eq!(dictionary.lookup_or(&key(&["T"]), "fallback"), "fallback");
        assert_eq!(dictionary.state(), DictionaryState::Failed);
    }

    #[rstest]
    fn reverse_lookup_without_support_makes_no_io() {
        let (mut dictionary, buffer, _sender) = active_dictionary(forward_only(2));

        assert!(dictionary.reverse_lookup("the").is_empty());
        assert_eq!(buffer.contents(), "");
        assert_eq!(dictionary.state(), DictionaryState::Active);
    }

    #[rstest]
    fn reverse_lookup_collects_stroke_keys() {
        let config = DictionaryConfig {
            longest_key: 2,
            max_latency: None,
            supports_reverse: true,
        };
        let (mut dictionary, _buffer, sender) = active_dictionary(config);
        feed_line(
            &sender,
            r#"{"seq": 0, "reverse-translation": [["T"], ["T", "*E"]]}"#,
        );

        let keys = dictionary.reverse_lookup("the");

        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&key(&["T"])));
    }

    #[rstest]
    fn malformed_reverse_payload_poisons_the_instance() {
        let config = DictionaryConfig {
            longest_key: 2,
            max_latency: None,
            supports_reverse: true,
        };
        let (mut dictionary, _buffer, sender) = active_dictionary(config);
        feed_line(&sender, r#"{"seq": 0, "reverse-translation": "not a list"}"#);

        assert!(dictionary.reverse_lookup("the").is_empty());
        assert_eq!(dictionary.state(), DictionaryState::Failed);
    }

    #[rstest]
    fn mutation_fails_read_only() {
        let mut dictionary = StdioDictionary::new();

        assert!(dictionary.is_readonly());
        assert_eq!(
            dictionary.insert(key(&["T"]), "the".into()),
            Err(DictionaryError::ReadOnly)
        );
        assert_eq!(
            dictionary.remove(&key(&["T"])),
            Err(DictionaryError::ReadOnly)
        );
    }

    #[rstest]
    fn load_failure_leaves_instance_uninitialized() {
        let mut dictionary = StdioDictionary::new();

        let result = dictionary.load(Path::new("/nonexistent/chordwire-dictionary"));

        assert!(result.is_err());
        assert_eq!(dictionary.state(), DictionaryState::Uninitialized);
        assert_eq!(dictionary.longest_key(), 0);
    }
}
