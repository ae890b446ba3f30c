/// Compile-time tuning knobs for the runtime.
///
/// Board support crates implement this for their own marker type and point
/// [`Cfg`] at it. Everything here is an associated const rather than a
/// runtime value: none of it can legitimately change after the image is
/// built, and keeping it `const` lets the timeout arithmetic fold away.
pub trait KernelConfig {
    /// Frequency of the tick interrupt that drives [`crate::time::now`].
    const TICK_FREQ_HZ: u32;

    /// Microseconds advanced per tick. Derived rather than configured
    /// directly so the two can never disagree.
    const MICROS_PER_TICK: i64 = 1_000_000 / Self::TICK_FREQ_HZ as i64;

    /// Upper bound, in microseconds, on how long `enter_exclusive` will
    /// spin trying to acquire the cross-core lock before giving up.
    const EXCLUSIVE_ACQUIRE_TIMEOUT_US: i64;

    /// Upper bound, in microseconds, on how long `enter_exclusive` will
    /// wait for the peer core to acknowledge that it has parked.
    const EXCLUSIVE_ACK_TIMEOUT_US: i64;

    /// Number of seqlock read attempts before `now()` gives up with `Timeout`.
    const TIME_READ_RETRY_BUDGET: u32;

    /// CPUID `PARTNO` field identifying the primary core (the Cortex-M7).
    const PRIMARY_PARTNO: u32 = 0xC27;
}

/// Default tuning, suitable for the reference board.
pub struct DefaultConfig;

impl KernelConfig for DefaultConfig {
    const TICK_FREQ_HZ: u32 = 1_000;
    const EXCLUSIVE_ACQUIRE_TIMEOUT_US: i64 = 50_000;
    const EXCLUSIVE_ACK_TIMEOUT_US: i64 = 50_000;
    const TIME_READ_RETRY_BUDGET: u32 = 8;
}

/// The configuration the rest of the crate is built against.
///
/// A downstream board crate that needs different timeouts forks this one
/// line rather than threading a generic parameter through every call site
/// in the crate — firmware images pick one concrete board up front, they
/// don't swap configs at runtime.
#[cfg(not(test))]
pub type Cfg = DefaultConfig;

#[cfg(test)]
pub type Cfg = TestConfig;

/// Tight timeouts so unit tests exercising the timeout paths don't spend
/// real wall-clock time waiting on them.
#[cfg(test)]
pub struct TestConfig;

#[cfg(test)]
impl KernelConfig for TestConfig {
    const TICK_FREQ_HZ: u32 = 1_000;
    const EXCLUSIVE_ACQUIRE_TIMEOUT_US: i64 = 20_000;
    const EXCLUSIVE_ACK_TIMEOUT_US: i64 = 20_000;
    const TIME_READ_RETRY_BUDGET: u32 = 8;
}
