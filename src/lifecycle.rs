//! Power-state transitions: cooperative dual-core shutdown, hardware
//! restart, and per-core idle sleep.

use crate::arch;
use crate::atomic::AtomicWord;
use crate::core_id::{current_core, CoreId};
use crate::percore::PerCore;
use crate::sync::critical;

static SHUTDOWN: PerCore<AtomicWord> = PerCore::new(AtomicWord::new(0), AtomicWord::new(0));

pub(crate) fn shutdown_flag(core: CoreId) -> &'static AtomicWord {
    SHUTDOWN.get(core)
}

/// Runs this core's exit-handler tables and parks it in deep sleep.
/// Never returns.
pub(crate) fn execute_shutdown(this: CoreId) -> ! {
    for handler in arch::core_exit_table(this) {
        log::info!("shutdown: running core exit handler");
        unsafe { handler() }
    }
    if this == CoreId::Primary {
        for handler in arch::mcu_exit_table() {
            log::info!("shutdown: running MCU exit handler");
            unsafe { handler() }
        }
    }
    arch::enter_deep_sleep();
    arch::data_barrier();
    arch::instruction_barrier();
    arch::halt()
}

/// Shuts down the system on both cores.
///
/// Raises this core's shutdown flag, wakes the peer with a signal event,
/// and waits for the peer to acknowledge (raise its own flag) before
/// running this core's own exit handlers — the peer's acknowledgment is
/// observed and acted on by its inter-core signal handler, see
/// [`crate::signal::on_peer_signal`]. The system stays in a low-power
/// state afterward until an external reset.
pub fn shutdown() -> ! {
    let this = current_core();
    shutdown_flag(this).store(1);
    arch::data_barrier();
    arch::signal_event();
    while shutdown_flag(this.peer()).load() != 1 {
        core::hint::spin_loop();
    }
    execute_shutdown(this)
}

/// Triggers a system reset on both cores via `AIRCR.SYSRESETREQ`. Never
/// returns.
pub fn restart() -> ! {
    arch::system_reset()
}

/// Puts this core into a low-power state until an event or interrupt
/// occurs. Does nothing if called from within a critical section, since
/// the whole point of a critical section is that interrupts stay masked.
pub fn sleep_cpu() {
    if !critical::is_critical() {
        arch::data_barrier();
        arch::instruction_barrier();
        arch::wait_for_interrupt();
    }
}

/// Forces this core's shutdown flag and sync state back to idle. Used
/// only by board-support cold-boot initialization to guarantee a clean
/// slate before this core's first use of the synchronization API.
pub fn reset_core_state() {
    shutdown_flag(current_core()).store(0);
    critical::reset();
    crate::sync::exclusive::reset();
}
