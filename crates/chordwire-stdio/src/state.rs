//! Dictionary instance lifecycle states.

/// Lifecycle state of a stdio dictionary instance.
///
/// `Uninitialized → Active` on a successful handshake; `Active → Failed`
/// on any unrecovered protocol, process, or timeout error. `Failed` is
/// terminal until an explicit reload re-enters the cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DictionaryState {
    /// No successful load yet, or the last load failed.
    #[default]
    Uninitialized,
    /// Handshake complete; lookups are serviced.
    Active,
    /// A fatal error occurred; lookups short-circuit until reload.
    Failed,
}

impl DictionaryState {
    /// Whether lookups may perform process I/O.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}
