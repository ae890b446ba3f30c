//! Cortex-M hardware backend for [`crate::arch`].
//!
//! Talks to the SCB directly via volatile register access for the bits the
//! `cortex-m` crate doesn't wrap (CPUID partno, AIRCR, SCR), and leans on
//! `cortex-m`'s asm/register helpers (`dsb`/`isb`/`sev`/`wfe`/`wfi`,
//! `BASEPRI`) everywhere else. Only builds for `target_arch = "arm"`; see
//! `arch::mock` for the host stand-in the test suite runs against.

use core::ptr;

use super::ExitFn;
use crate::config::{Cfg, KernelConfig};
use crate::core_id::CoreId;

const SCB_CPUID: *const u32 = 0xE000_ED00 as *const u32;
const SCB_AIRCR: *mut u32 = 0xE000_ED0C as *mut u32;
const SCB_SCR: *mut u32 = 0xE000_ED10 as *mut u32;

const CPUID_PARTNO_MASK: u32 = 0xFFF0;
const CPUID_PARTNO_SHIFT: u32 = 4;

const AIRCR_VECTKEY_POS: u32 = 16;
const AIRCR_VECTKEY_MASK: u32 = 0xFFFF << AIRCR_VECTKEY_POS;
const AIRCR_VECTKEY: u32 = 0x05FA << AIRCR_VECTKEY_POS;
const AIRCR_SYSRESETREQ: u32 = 1 << 2;

const SCR_SLEEPDEEP: u32 = 1 << 2;

pub(crate) fn current_core() -> CoreId {
    let cpuid = unsafe { ptr::read_volatile(SCB_CPUID) };
    let partno = (cpuid & CPUID_PARTNO_MASK) >> CPUID_PARTNO_SHIFT;
    if partno == Cfg::PRIMARY_PARTNO {
        CoreId::Primary
    } else {
        CoreId::Secondary
    }
}

pub(crate) fn in_interrupt() -> bool {
    let ipsr: u32;
    unsafe {
        core::arch::asm!(
            "mrs {0}, ipsr",
            out(reg) ipsr,
            options(nomem, nostack, preserves_flags),
        );
    }
    ipsr != 0
}

pub(crate) fn mask_interrupts() {
    cortex_m::register::basepri::write(1);
    cortex_m::asm::isb();
}

pub(crate) fn unmask_interrupts() {
    cortex_m::register::basepri::write(0);
    cortex_m::asm::isb();
}

pub(crate) fn instruction_barrier() {
    cortex_m::asm::isb();
}

pub(crate) fn data_barrier() {
    cortex_m::asm::dsb();
}

pub(crate) fn signal_event() {
    cortex_m::asm::sev();
}

pub(crate) fn wait_for_event() {
    cortex_m::asm::wfe();
}

pub(crate) fn wait_for_interrupt() {
    cortex_m::asm::wfi();
}

pub(crate) fn enter_deep_sleep() {
    unsafe {
        let scr = ptr::read_volatile(SCB_SCR);
        ptr::write_volatile(SCB_SCR, scr | SCR_SLEEPDEEP);
    }
}

pub(crate) fn system_reset() -> ! {
    unsafe {
        // FAULTMASK: nothing, not even a fault handler, runs after this.
        core::arch::asm!("cpsid f", options(nomem, nostack, preserves_flags));
        let aircr = ptr::read_volatile(SCB_AIRCR);
        let next = (aircr & !AIRCR_VECTKEY_MASK) | AIRCR_VECTKEY | AIRCR_SYSRESETREQ;
        ptr::write_volatile(SCB_AIRCR, next);
    }
    cortex_m::asm::dsb();
    cortex_m::asm::isb();
    halt();
}

pub(crate) fn halt() -> ! {
    loop {
        cortex_m::asm::wfe();
    }
}

extern "C" {
    static __primary_exit_start: ExitFn;
    static __primary_exit_end: ExitFn;
    static __secondary_exit_start: ExitFn;
    static __secondary_exit_end: ExitFn;
    static __mcu_exit_start: ExitFn;
    static __mcu_exit_end: ExitFn;
}

unsafe fn table_from(start: *const ExitFn, end: *const ExitFn) -> &'static [ExitFn] {
    let len = unsafe { end.offset_from(start) } as usize;
    unsafe { core::slice::from_raw_parts(start, len) }
}

pub(crate) fn core_exit_table(core: CoreId) -> &'static [ExitFn] {
    unsafe {
        match core {
            CoreId::Primary => table_from(&__primary_exit_start, &__primary_exit_end),
            CoreId::Secondary => table_from(&__secondary_exit_start, &__secondary_exit_end),
        }
    }
}

pub(crate) fn mcu_exit_table() -> &'static [ExitFn] {
    unsafe { table_from(&__mcu_exit_start, &__mcu_exit_end) }
}
