//! Stroke-sequence lookup keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An ordered, immutable sequence of steno strokes used as a lookup key.
///
/// Equality, hashing, and ordering follow the stroke sequence content, so a
/// `StrokeKey` can serve as a map or set key. On the wire it serialises as a
/// plain JSON array of stroke strings.
///
/// # Example
///
/// ```
/// use chordwire_core::StrokeKey;
///
/// let key: StrokeKey = ["KAT", "HROG"].into_iter().collect();
/// assert_eq!(key.len(), 2);
/// assert_eq!(key.to_string(), "KAT/HROG");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeKey {
    strokes: Vec<String>,
}

impl StrokeKey {
    /// Creates a key from a sequence of strokes.
    #[must_use]
    pub fn new(strokes: Vec<String>) -> Self {
        Self { strokes }
    }

    /// Returns the number of strokes in the key.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Returns `true` when the key contains no strokes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Returns the strokes in order.
    #[must_use]
    pub fn strokes(&self) -> &[String] {
        &self.strokes
    }
}

impl fmt::Display for StrokeKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.strokes.join("/"))
    }
}

impl<S: Into<String>> FromIterator<S> for StrokeKey {
    fn from_iter<I: IntoIterator<Item = S>>(strokes: I) -> Self {
        Self {
            strokes: strokes.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&[&str]> for StrokeKey {
    fn from(strokes: &[&str]) -> Self {
        strokes.iter().copied().collect()
    }
}
