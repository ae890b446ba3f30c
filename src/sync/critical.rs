//! Per-core critical sections: disable this core's interrupts and pin the
//! scheduler, nestably.

use core::sync::atomic::{AtomicI32, Ordering};

use crate::arch;
use crate::error::Errc;
use crate::percore::PerCore;

static DEPTH: PerCore<AtomicI32> = PerCore::new(AtomicI32::new(0), AtomicI32::new(0));

/// Enters a critical section.
///
/// Nestable: every call must be matched with [`exit`]. While nested at
/// least once, this core's interrupts are masked and any interrupt that
/// fires waits for the last matching `exit` before it is serviced.
pub fn enter() {
    let depth = DEPTH.current();
    if depth.fetch_add(1, Ordering::SeqCst) == 0 {
        arch::mask_interrupts();
        arch::instruction_barrier();
    }
}

/// Exits a critical section.
///
/// # Errors
/// Returns [`Errc::InvalidState`] if called while not within a critical
/// section; state is unchanged in that case.
pub fn exit() -> Result<(), Errc> {
    let depth = DEPTH.current();
    if depth.load(Ordering::SeqCst) == 0 {
        return Err(Errc::InvalidState);
    }
    if depth.fetch_sub(1, Ordering::SeqCst) == 1 {
        arch::unmask_interrupts();
        arch::instruction_barrier();
    }
    Ok(())
}

/// Whether the calling thread/interrupt is within a critical section.
pub fn is_critical() -> bool {
    DEPTH.current().load(Ordering::SeqCst) != 0
}

/// Forces this core's critical-section depth back to zero and unmasks
/// interrupts, regardless of current nesting. Used only when tearing down
/// state during shutdown — never reachable from the public API.
pub(crate) fn reset() {
    DEPTH.current().store(0, Ordering::SeqCst);
    arch::unmask_interrupts();
    arch::instruction_barrier();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::mock::{basepri, set_current_core};
    use crate::core_id::CoreId;

    fn reset_state() {
        set_current_core(CoreId::Primary);
        reset();
    }

    #[test]
    fn exit_without_enter_is_invalid_state() {
        let _guard = crate::test_support::lock();
        reset_state();
        assert_eq!(exit(), Err(Errc::InvalidState));
    }

    #[test]
    fn nesting_masks_once_and_unmasks_on_last_exit() {
        let _guard = crate::test_support::lock();
        reset_state();
        assert_eq!(basepri(CoreId::Primary), 0);
        enter();
        enter();
        assert!(is_critical());
        assert_eq!(basepri(CoreId::Primary), 1);
        exit().unwrap();
        assert!(is_critical());
        assert_eq!(basepri(CoreId::Primary), 1);
        exit().unwrap();
        assert!(!is_critical());
        assert_eq!(basepri(CoreId::Primary), 0);
    }

    #[test]
    fn cores_have_independent_depth() {
        let _guard = crate::test_support::lock();
        set_current_core(CoreId::Primary);
        reset();
        enter();
        set_current_core(CoreId::Secondary);
        reset();
        assert!(!is_critical());
        set_current_core(CoreId::Primary);
        assert!(is_critical());
        exit().unwrap();
    }
}
