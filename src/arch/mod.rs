//! Platform seam between the synchronization/lifecycle protocol and raw
//! hardware access.
//!
//! Everything above this module is written once, against these free
//! functions; only this module and its two children know that a real
//! build targets Cortex-M registers and a host build drives a software
//! stand-in. Mirrors the re-export pattern used to pick a backend by
//! target architecture elsewhere in this codebase — add a new MCU family
//! by adding a sibling module and a `cfg` arm here, nothing downstream
//! changes.

/// An entry in a linker-provided exit-handler table.
pub(crate) type ExitFn = unsafe extern "C" fn();

#[cfg(target_arch = "arm")]
mod cortex_m_hw;
#[cfg(target_arch = "arm")]
pub(crate) use cortex_m_hw::*;

#[cfg(not(target_arch = "arm"))]
pub(crate) mod mock;
#[cfg(not(target_arch = "arm"))]
pub(crate) use mock::*;
