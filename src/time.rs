//! Monotonic time: a free-running microsecond counter fed by the periodic
//! tick interrupt, read lock-free from any context via a seqlock, plus
//! unit conversions and cooperative sleeps built on top of it.

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::atomic::AtomicWord;
use crate::config::{Cfg, KernelConfig};
use crate::core_id::in_interrupt;
use crate::error::Errc;

static SEQ: AtomicWord = AtomicWord::new(0);
static LO: AtomicWord = AtomicWord::new(0);
static HI: AtomicWord = AtomicWord::new(0);

fn combine(lo: u32, hi: u32) -> i64 {
    ((hi as i64) << 32) | (lo as i64 & 0xFFFF_FFFF)
}

fn split(value: i64) -> (u32, u32) {
    (value as u32, (value >> 32) as u32)
}

/// Advances the time counter by one tick's worth of microseconds.
///
/// Called from the tick interrupt only. Single-writer: nothing else ever
/// stores to `LO`/`HI`, so the two halves and the surrounding sequence
/// bump don't need a CAS, just visibility for [`now`]'s readers.
pub fn advance_tick() {
    SEQ.fetch_add(1);
    let current = combine(LO.load(), HI.load());
    let (lo, hi) = split(current + Cfg::MICROS_PER_TICK);
    LO.store(lo);
    HI.store(hi);
    SEQ.fetch_add(1);
}

/// Reads the current time, in microseconds since boot.
///
/// # Errors
/// [`Errc::Timeout`] if the reader can't observe a stable, even sequence
/// number within the configured retry budget — only possible if the tick
/// interrupt preempts the read an implausible number of times in a row.
pub fn now() -> Result<i64, Errc> {
    for _ in 0..Cfg::TIME_READ_RETRY_BUDGET {
        let seq_start = SEQ.load();
        let lo = LO.load();
        let hi = HI.load();
        let seq_end = SEQ.load();
        if seq_start == seq_end && seq_start & 1 == 0 {
            return Ok(combine(lo, hi));
        }
    }
    Err(Errc::Timeout)
}

fn default_yield() {
    core::hint::spin_loop();
}

static YIELD_HOOK: AtomicUsize = AtomicUsize::new(default_yield as usize);

/// Overrides the hook [`sleep`]/[`sleep_until`] call while waiting.
///
/// Defaults to [`core::hint::spin_loop`]. A board running a cooperative
/// scheduler should install its own thread-yield function here so a
/// sleeping thread doesn't starve the ones that could make progress.
pub fn set_yield_hook(hook: fn()) {
    YIELD_HOOK.store(hook as usize, Ordering::SeqCst);
}

fn yield_now() {
    let ptr = YIELD_HOOK.load(Ordering::SeqCst);
    // SAFETY: only ever stored from a `fn()` value by `set_yield_hook`.
    let hook: fn() = unsafe { core::mem::transmute::<usize, fn()>(ptr) };
    hook();
}

/// Blocks the calling thread for at least `duration` microseconds.
///
/// # Errors
/// [`Errc::InvalidArg`] if `duration` is negative. [`Errc::Internal`] if
/// the time source fails while waiting. Must not be called from an
/// interrupt context.
pub fn sleep(duration: i64) -> Result<(), Errc> {
    if duration < 0 {
        return Err(Errc::InvalidArg);
    }
    debug_assert!(!in_interrupt(), "sleep() called from interrupt context");
    let start = now().map_err(|_| Errc::Internal)?;
    loop {
        let elapsed = now().map_err(|_| Errc::Internal)? - start;
        if elapsed >= duration {
            return Ok(());
        }
        yield_now();
    }
}

/// Blocks the calling thread until the clock reaches `deadline`.
///
/// # Errors
/// [`Errc::InvalidArg`] if `deadline` is already in the past.
/// [`Errc::Internal`] if the time source fails while waiting. Must not be
/// called from an interrupt context.
pub fn sleep_until(deadline: i64) -> Result<(), Errc> {
    debug_assert!(
        !in_interrupt(),
        "sleep_until() called from interrupt context"
    );
    let current = now().map_err(|_| Errc::Internal)?;
    if deadline < current {
        return Err(Errc::InvalidArg);
    }
    loop {
        if now().map_err(|_| Errc::Internal)? >= deadline {
            return Ok(());
        }
        yield_now();
    }
}

const MICROS_MUL: i64 = 1;
const MILLIS_MUL: i64 = 1_000;
const SECONDS_MUL: i64 = 1_000_000;
const MINUTES_MUL: i64 = 60_000_000;
const HOURS_MUL: i64 = 3_600_000_000;
const DAYS_MUL: i64 = 86_400_000_000;

/// Identity conversion; kept symmetric with the other units since time is
/// itself stored in microseconds.
pub fn micros_to_time(micros: i64) -> Result<i64, Errc> {
    if micros < 0 {
        return Err(Errc::InvalidArg);
    }
    Ok(micros * MICROS_MUL)
}

/// Identity conversion; kept symmetric with the other units since time is
/// itself stored in microseconds.
pub fn time_to_micros(time: i64) -> Result<i64, Errc> {
    if time < 0 {
        return Err(Errc::InvalidArg);
    }
    Ok(time / MICROS_MUL)
}

macro_rules! unit_pair {
    ($to_time:ident, $from_time:ident, $mul:expr, $unit:literal) => {
        #[doc = concat!("Converts a duration in ", $unit, " to a `Time` value (microseconds).")]
        ///
        /// # Errors
        /// [`Errc::InvalidArg`] if negative, [`Errc::Overflow`] if the
        /// result doesn't fit in 64 bits.
        pub fn $to_time(value: i64) -> Result<i64, Errc> {
            if value < 0 {
                return Err(Errc::InvalidArg);
            }
            value.checked_mul($mul).ok_or(Errc::Overflow)
        }

        #[doc = concat!("Converts a `Time` value (microseconds) to whole ", $unit, ", truncating.")]
        ///
        /// # Errors
        /// [`Errc::InvalidArg`] if `time` is negative.
        pub fn $from_time(time: i64) -> Result<i64, Errc> {
            if time < 0 {
                return Err(Errc::InvalidArg);
            }
            Ok(time / $mul)
        }
    };
}

unit_pair!(millis_to_time, time_to_millis, MILLIS_MUL, "milliseconds");
unit_pair!(seconds_to_time, time_to_seconds, SECONDS_MUL, "seconds");
unit_pair!(minutes_to_time, time_to_minutes, MINUTES_MUL, "minutes");
unit_pair!(hours_to_time, time_to_hours, HOURS_MUL, "hours");
unit_pair!(days_to_time, time_to_days, DAYS_MUL, "days");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::mock::set_current_core;
    use crate::core_id::CoreId;

    fn reset() {
        SEQ.store(0);
        LO.store(0);
        HI.store(0);
        set_current_core(CoreId::Primary);
    }

    #[test]
    fn advance_tick_moves_clock_forward() {
        let _guard = crate::test_support::lock();
        reset();
        let before = now().unwrap();
        advance_tick();
        let after = now().unwrap();
        assert!(after > before);
        assert_eq!(after - before, Cfg::MICROS_PER_TICK);
    }

    #[test]
    fn seqlock_read_is_stable_absent_writers() {
        let _guard = crate::test_support::lock();
        reset();
        advance_tick();
        let a = now().unwrap();
        let b = now().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sleep_rejects_negative_duration() {
        let _guard = crate::test_support::lock();
        reset();
        assert_eq!(sleep(-1), Err(Errc::InvalidArg));
    }

    #[test]
    fn sleep_until_rejects_past_deadline() {
        let _guard = crate::test_support::lock();
        reset();
        advance_tick();
        advance_tick();
        let current = now().unwrap();
        assert_eq!(sleep_until(current - 1), Err(Errc::InvalidArg));
    }

    #[test]
    fn millis_round_trip() {
        assert_eq!(millis_to_time(5), Ok(5_000));
        assert_eq!(time_to_millis(5_000), Ok(5));
    }

    #[test]
    fn seconds_to_time_overflows_cleanly() {
        assert_eq!(seconds_to_time(i64::MAX), Err(Errc::Overflow));
    }

    #[test]
    fn negative_unit_values_are_rejected() {
        assert_eq!(hours_to_time(-1), Err(Errc::InvalidArg));
        assert_eq!(time_to_hours(-1), Err(Errc::InvalidArg));
    }
}
