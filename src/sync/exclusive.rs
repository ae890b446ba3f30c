//! Cross-core exclusive sections.
//!
//! While held, nothing on the peer core may continue running application
//! code: the peer's inter-core signal handler (see [`crate::signal`])
//! notices the lock is held against it and parks, raising its
//! acknowledgment flag so the holder knows it is safe to proceed. The
//! whole dance — CAS the lock word, wait for the peer's ack, clear it on
//! exit — always runs inside this core's own critical section, since a
//! core can't be interrupted mid-protocol without risking a second
//! attempt to enter racing the first.

use crate::atomic::AtomicWord;
use crate::config::{Cfg, KernelConfig};
use crate::core_id::{current_core, CoreId};
use crate::error::Errc;
use crate::percore::PerCore;
use crate::sync::critical;
use crate::time;

static LOCK: AtomicWord = AtomicWord::new(0);
static NESTING: AtomicWord = AtomicWord::new(0);
static ACK: PerCore<AtomicWord> = PerCore::new(AtomicWord::new(0), AtomicWord::new(0));

pub(crate) fn lock_word() -> &'static AtomicWord {
    &LOCK
}

pub(crate) fn ack_flag(core: CoreId) -> &'static AtomicWord {
    ACK.get(core)
}

fn exit_critical_mapped() -> Result<(), Errc> {
    critical::exit().map_err(|_| Errc::Internal)
}

/// Rolls nesting back by one, clearing the lock if this was the last holder.
/// Only valid to call while still holding the lock.
fn unwind_nesting() {
    if NESTING.fetch_sub(1) == 1 {
        LOCK.store(0);
    }
}

/// Enters an exclusive section.
///
/// Nestable: every call must be matched with [`exit`]. While held, the
/// peer core cannot execute non-interrupt code.
///
/// # Errors
/// - [`Errc::Timeout`] if the lock can't be acquired, or the peer's
///   acknowledgment doesn't arrive, within the configured timeout. State
///   is unchanged.
/// - [`Errc::Internal`] if the time source fails mid-protocol. State is
///   then undefined.
pub fn enter() -> Result<(), Errc> {
    critical::enter();
    let this = current_core();
    let this_tag = this.tag() as u32;
    let alt_tag = this.peer().tag() as u32;

    if LOCK.load() != this_tag {
        let start = match time::now() {
            Ok(t) => t,
            Err(_) => {
                let _ = critical::exit();
                return Err(Errc::Internal);
            }
        };
        let mut expected = 0u32;
        loop {
            match LOCK.compare_exchange(expected, this_tag) {
                Ok(()) => break,
                Err(observed) => {
                    let elapsed = match time::now() {
                        Ok(t) => t - start,
                        Err(_) => {
                            let _ = critical::exit();
                            return Err(Errc::Internal);
                        }
                    };
                    if elapsed > Cfg::EXCLUSIVE_ACQUIRE_TIMEOUT_US {
                        log::warn!("enter_exclusive: timed out acquiring lock from peer");
                        let _ = critical::exit();
                        return Err(Errc::Timeout);
                    }
                    if observed == alt_tag {
                        ack_flag(this).store(1);
                    }
                    expected = 0;
                }
            }
        }
        // Freshly acquired (not a nested re-entry): the peer may be
        // running ordinary code with interrupts enabled and has no reason
        // to suspect it's blocked — wake it so its signal handler notices
        // the lock and starts acknowledging. A re-entrant acquire skips
        // this: the peer is already parked and holding its ack high from
        // the original acquire.
        crate::arch::data_barrier();
        crate::arch::signal_event();
    }

    ack_flag(this).store(0);
    NESTING.fetch_add(1);

    let start = match time::now() {
        Ok(t) => t,
        Err(_) => {
            unwind_nesting();
            let _ = critical::exit();
            return Err(Errc::Internal);
        }
    };
    loop {
        if ack_flag(this.peer()).load() == 1 {
            break;
        }
        let elapsed = match time::now() {
            Ok(t) => t - start,
            Err(_) => {
                unwind_nesting();
                let _ = critical::exit();
                return Err(Errc::Internal);
            }
        };
        if elapsed > Cfg::EXCLUSIVE_ACK_TIMEOUT_US {
            log::warn!("enter_exclusive: peer never acknowledged within timeout");
            unwind_nesting();
            let _ = critical::exit();
            return Err(Errc::Timeout);
        }
    }

    exit_critical_mapped()
}

/// Exits an exclusive section.
///
/// # Errors
/// - [`Errc::InvalidState`] if called while not within an exclusive
///   section on this core.
/// - [`Errc::Timeout`] if the peer's acknowledgment is no longer present
///   (it gave up waiting before this core released the lock). State is
///   unchanged in both cases.
/// - [`Errc::Internal`] if the critical section underneath is in an
///   unexpected state; state is then undefined.
pub fn exit() -> Result<(), Errc> {
    critical::enter();
    let this = current_core();
    if LOCK.load() != this.tag() as u32 {
        let _ = critical::exit();
        return Err(Errc::InvalidState);
    }
    if ack_flag(this.peer()).load() == 0 {
        let _ = critical::exit();
        return Err(Errc::Timeout);
    }
    unwind_nesting();
    exit_critical_mapped()
}

/// Whether the calling thread/interrupt is within an exclusive section
/// held by this core.
pub fn is_exclusive() -> bool {
    LOCK.load() == current_core().tag() as u32
}

/// Forces this core's exclusive-section state back to idle if (and only
/// if) this core currently holds the lock. Used only when tearing down
/// state during shutdown — never reachable from the public API.
pub(crate) fn reset() {
    critical::enter();
    if LOCK.load() == current_core().tag() as u32 {
        NESTING.store(0);
        LOCK.store(0);
    }
    let _ = critical::exit();
}
