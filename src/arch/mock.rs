//! Host stand-in for [`crate::arch`], used by every non-ARM build of this
//! crate — unit tests compiled in-crate and the `tests/` integration
//! suite alike.
//!
//! Each simulated core is an OS thread that calls [`set_current_core`]
//! once at startup. Interrupt delivery is modeled by [`signal_event`]
//! posting to the peer's pending-signal flag and a test-owned watcher
//! thread draining it with [`take_pending_signal`] and invoking
//! `signal::on_peer_signal` — there is no automatic dispatch, because
//! nothing here runs in a real interrupt context.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use super::ExitFn;
use crate::core_id::CoreId;

thread_local! {
    static CURRENT_CORE: Cell<CoreId> = Cell::new(CoreId::Primary);
    static IN_INTERRUPT: Cell<bool> = Cell::new(false);
}

/// Pins the calling OS thread to a simulated core identity. Test-only.
pub fn set_current_core(core: CoreId) {
    CURRENT_CORE.with(|c| c.set(core));
}

pub(crate) fn current_core() -> CoreId {
    CURRENT_CORE.with(|c| c.get())
}

/// Marks the calling thread as running simulated interrupt code. Test-only.
pub fn set_in_interrupt(value: bool) {
    IN_INTERRUPT.with(|c| c.set(value));
}

pub(crate) fn in_interrupt() -> bool {
    IN_INTERRUPT.with(|c| c.get())
}

fn slot(core: CoreId) -> usize {
    match core {
        CoreId::Primary => 0,
        CoreId::Secondary => 1,
    }
}

static BASEPRI: [AtomicU32; 2] = [AtomicU32::new(0), AtomicU32::new(0)];

pub(crate) fn mask_interrupts() {
    BASEPRI[slot(current_core())].store(1, Ordering::SeqCst);
}

pub(crate) fn unmask_interrupts() {
    BASEPRI[slot(current_core())].store(0, Ordering::SeqCst);
}

/// Observes the simulated interrupt-mask level for a core. Test-only.
pub fn basepri(core: CoreId) -> u32 {
    BASEPRI[slot(core)].load(Ordering::SeqCst)
}

pub(crate) fn instruction_barrier() {
    std::sync::atomic::fence(Ordering::SeqCst);
}

pub(crate) fn data_barrier() {
    std::sync::atomic::fence(Ordering::SeqCst);
}

static PENDING_SIGNAL: [AtomicBool; 2] = [AtomicBool::new(false), AtomicBool::new(false)];

pub(crate) fn signal_event() {
    PENDING_SIGNAL[slot(current_core().peer())].store(true, Ordering::SeqCst);
}

/// Drains the simulated pending-signal flag for `core`. Test-only — stands
/// in for the real interrupt controller delivering the event posted by
/// [`signal_event`].
pub fn take_pending_signal(core: CoreId) -> bool {
    PENDING_SIGNAL[slot(core)].swap(false, Ordering::SeqCst)
}

pub(crate) fn wait_for_event() {
    std::thread::yield_now();
}

pub(crate) fn wait_for_interrupt() {
    std::thread::yield_now();
}

static DEEP_SLEEP: AtomicBool = AtomicBool::new(false);

pub(crate) fn enter_deep_sleep() {
    DEEP_SLEEP.store(true, Ordering::SeqCst);
}

/// Observes whether `enter_deep_sleep` has been called. Test-only.
pub fn deep_sleep_entered() -> bool {
    DEEP_SLEEP.load(Ordering::SeqCst)
}

pub(crate) fn system_reset() -> ! {
    panic!("__mock_system_reset__");
}

pub(crate) fn halt() -> ! {
    panic!("__mock_halt__");
}

/// Call log for the sentinel exit handlers below, in invocation order.
/// Test-only — the handlers themselves are bare `extern "C" fn`s and can't
/// capture state, so they push their name here instead.
pub static EXIT_LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

unsafe extern "C" fn primary_exit_0() {
    EXIT_LOG.lock().unwrap().push("primary[0]");
}
unsafe extern "C" fn primary_exit_1() {
    EXIT_LOG.lock().unwrap().push("primary[1]");
}
unsafe extern "C" fn secondary_exit_0() {
    EXIT_LOG.lock().unwrap().push("secondary[0]");
}
unsafe extern "C" fn mcu_exit_0() {
    EXIT_LOG.lock().unwrap().push("mcu[0]");
}

static PRIMARY_TABLE: [ExitFn; 2] = [primary_exit_0, primary_exit_1];
static SECONDARY_TABLE: [ExitFn; 1] = [secondary_exit_0];
static MCU_TABLE: [ExitFn; 1] = [mcu_exit_0];

pub(crate) fn core_exit_table(core: CoreId) -> &'static [ExitFn] {
    match core {
        CoreId::Primary => &PRIMARY_TABLE,
        CoreId::Secondary => &SECONDARY_TABLE,
    }
}

pub(crate) fn mcu_exit_table() -> &'static [ExitFn] {
    &MCU_TABLE
}
