use core::fmt;

/// Flat error taxonomy shared by every fallible operation in this crate.
///
/// There is deliberately no "success" sentinel variant — callers get
/// `Result<T, Errc>` instead of an out-parameter, so `Ok` already carries
/// that meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errc {
    /// Caller supplied a disallowed value (e.g. a negative duration).
    InvalidArg,
    /// Operation is illegal in the current state (e.g. unmatched `exit_critical`).
    InvalidState,
    /// A bounded wait exhausted its timeout.
    Timeout,
    /// Arithmetic overflow in a unit conversion.
    Overflow,
    /// An inner call unexpectedly failed. State is undefined except where documented.
    Internal,
    /// Resource is engaged. Never produced by this crate directly; reserved
    /// for peripheral drivers layered on top of it.
    Busy,
}

impl fmt::Display for Errc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Errc::InvalidArg => "invalid argument",
            Errc::InvalidState => "invalid state",
            Errc::Timeout => "timed out",
            Errc::Overflow => "arithmetic overflow",
            Errc::Internal => "internal error",
            Errc::Busy => "resource busy",
        };
        f.write_str(msg)
    }
}
