//! Shared steno dictionary contract.
//!
//! The crate defines the data model and the behavioural contract that
//! concrete dictionary backends implement: [`StrokeKey`] lookup keys, the
//! [`StenoDictionary`] trait with forward and reverse lookups, and the
//! small error vocabulary a host sees ([`DictionaryError`], [`LoadError`]).
//! Keeping the contract in its own crate lets hosts and tests depend on the
//! interface without pulling in any process-spawning machinery.

mod dictionary;
mod key;

pub use dictionary::{DictionaryError, LoadError, StenoDictionary};
pub use key::StrokeKey;
