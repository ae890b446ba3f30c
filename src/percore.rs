use crate::core_id::{current_core, CoreId};

/// A pair of per-core slots, selected by [`current_core`].
///
/// Most of this crate's global state is naturally one-per-core (critical
/// section depth, acknowledgment flags, shutdown flags). This centralizes
/// the "which half is mine" indexing instead of repeating a
/// `match current_core() { ... }` at every call site.
pub(crate) struct PerCore<T> {
    primary: T,
    secondary: T,
}

impl<T> PerCore<T> {
    pub(crate) const fn new(primary: T, secondary: T) -> Self {
        Self { primary, secondary }
    }

    pub(crate) fn get(&self, core: CoreId) -> &T {
        match core {
            CoreId::Primary => &self.primary,
            CoreId::Secondary => &self.secondary,
        }
    }

    pub(crate) fn current(&self) -> &T {
        self.get(current_core())
    }
}
