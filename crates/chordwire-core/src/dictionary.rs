//! Abstractions over concrete dictionary backends.

use std::collections::BTreeSet;
use std::error::Error;
use std::path::Path;

use thiserror::Error;

use crate::key::StrokeKey;

/// Errors a lookup or mutation can report to the host.
///
/// Backends contain their internal failures (process crashes, protocol
/// violations, timeouts) and degrade to empty results; the only errors that
/// cross the trait boundary are the two the host must act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DictionaryError {
    /// The key has no translation (the normal miss outcome).
    #[error("key not found")]
    NotFound,

    /// The dictionary does not accept writes.
    #[error("dictionary is read-only")]
    ReadOnly,
}

/// Errors reported when loading a dictionary from a path.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct LoadError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl LoadError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-friendly description without the optional source.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Behaviour required from concrete dictionary backends.
///
/// The host calls `load` once (and again to recover a failed backend), then
/// drives lookups from a single control thread. `longest_key` lets the host
/// prune impossible lookups before calling in. Implementations that never
/// accept writes report `is_readonly() == true` and fail mutations with
/// [`DictionaryError::ReadOnly`].
pub trait StenoDictionary {
    /// Loads (or reloads) the dictionary from the given path.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the backend cannot be brought into a
    /// usable state; the dictionary then services no lookups until a later
    /// `load` succeeds.
    fn load(&mut self, path: &Path) -> Result<(), LoadError>;

    /// The maximum stroke-sequence length this dictionary can ever match.
    ///
    /// Zero until a `load` has succeeded.
    fn longest_key(&self) -> usize;

    /// Whether the dictionary rejects mutation.
    fn is_readonly(&self) -> bool;

    /// Tests whether a key has a translation.
    fn contains(&mut self, key: &StrokeKey) -> bool;

    /// Returns the translation for a key.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::NotFound`] when the key has no
    /// translation.
    fn lookup(&mut self, key: &StrokeKey) -> Result<String, DictionaryError>;

    /// Returns the translation for a key, or `fallback` when absent.
    fn lookup_or(&mut self, key: &StrokeKey, fallback: &str) -> String;

    /// Returns every stroke sequence that produces the given text.
    fn reverse_lookup(&mut self, text: &str) -> BTreeSet<StrokeKey>;

    /// Inserts or replaces a translation.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::ReadOnly`] for read-only dictionaries.
    fn insert(&mut self, _key: StrokeKey, _translation: String) -> Result<(), DictionaryError> {
        Err(DictionaryError::ReadOnly)
    }

    /// Removes a translation.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::ReadOnly`] for read-only dictionaries.
    fn remove(&mut self, _key: &StrokeKey) -> Result<(), DictionaryError> {
        Err(DictionaryError::ReadOnly)
    }
}
