//! Typed 32-bit cross-core word, used for every piece of state the two
//! cores actually share (lock tag, nesting count, sequence counter,
//! ack/shutdown flags).
//!
//! The rest of the crate never reaches for `core::sync::atomic` directly —
//! centralizing it here means the "every cross-core access is `SeqCst`"
//! policy lives in one place instead of being a call-site convention, and
//! mirrors the `uint32_t*` casts the reference firmware used for its
//! signed state words.

use core::sync::atomic::{AtomicU32, Ordering};

#[repr(transparent)]
pub(crate) struct AtomicWord(AtomicU32);

impl AtomicWord {
    pub(crate) const fn new(value: u32) -> Self {
        Self(AtomicU32::new(value))
    }

    #[inline]
    pub(crate) fn load(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    #[inline]
    pub(crate) fn store(&self, value: u32) {
        self.0.store(value, Ordering::SeqCst);
    }

    #[inline]
    pub(crate) fn fetch_add(&self, value: u32) -> u32 {
        self.0.fetch_add(value, Ordering::SeqCst)
    }

    #[inline]
    pub(crate) fn fetch_sub(&self, value: u32) -> u32 {
        self.0.fetch_sub(value, Ordering::SeqCst)
    }

    /// Compare-and-swap: replaces the word with `new` if it currently
    /// equals `current`. Returns the observed value on failure, mirroring
    /// the C compare-exchange idiom where the expected-value pointer is
    /// updated in place.
    #[inline]
    pub(crate) fn compare_exchange(&self, current: u32, new: u32) -> Result<(), u32> {
        self.0
            .compare_exchange(current, new, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
    }
}
