//! Synchronization and lifecycle runtime shared by both cores of a
//! dual-core Cortex-M MCU.
//!
//! Three things live here, all in terms of the two physical cores rather
//! than any notion of threads or tasks:
//!
//! - **Critical sections** ([`sync::critical`]) — per-core, interrupt-masking, nestable.
//! - **Exclusive sections** ([`sync::exclusive`]) — cross-core mutual exclusion, built
//!   on a CAS'd lock word and a signal-and-acknowledge handshake serviced by
//!   [`signal::on_peer_signal`].
//! - **Lifecycle** ([`lifecycle`]) — cooperative two-core shutdown, hardware restart,
//!   per-core idle sleep.
//!
//! [`time`] provides the monotonic clock the timeouts above are measured
//! against, read lock-free via a seqlock since this target has no native
//! 64-bit atomics.
//!
//! `no_std` on real hardware; built against `std` everywhere else so the
//! test suite can run two simulated cores as OS threads (`arch::mock`).

#![cfg_attr(target_arch = "arm", no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

mod arch;
mod atomic;
mod percore;

#[cfg(test)]
mod test_support;

pub mod config;
pub mod core_id;
pub mod error;
pub mod lifecycle;
pub mod signal;
pub mod sync;
pub mod time;

pub use config::{DefaultConfig, KernelConfig};
pub use core_id::{current_core, in_interrupt, CoreId};
pub use error::Errc;
pub use lifecycle::{reset_core_state, restart, shutdown, sleep_cpu};
pub use signal::on_peer_signal;
pub use sync::critical::{enter as enter_critical, exit as exit_critical, is_critical};
pub use sync::exclusive::{enter as enter_exclusive, exit as exit_exclusive, is_exclusive};
pub use time::{
    advance_tick, days_to_time, hours_to_time, micros_to_time, millis_to_time, minutes_to_time,
    now, seconds_to_time, set_yield_hook, sleep, sleep_until, time_to_days, time_to_hours,
    time_to_micros, time_to_millis, time_to_minutes, time_to_seconds,
};

/// Host-only test seams, re-exported for the `tests/` integration suite.
/// Not part of the crate's stable API.
#[cfg(not(target_arch = "arm"))]
#[doc(hidden)]
pub mod testing {
    pub use crate::arch::mock::{
        basepri, deep_sleep_entered, set_current_core, set_in_interrupt, take_pending_signal,
        EXIT_LOG,
    };
}
