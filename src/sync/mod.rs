//! Synchronization primitives.
//!
//! Lock ordering: a critical section may be entered while already holding
//! an exclusive section, never the other way around — `exclusive::enter`
//! always takes its own critical section internally, so code that holds
//! an exclusive section and then calls `critical::enter` is just nesting
//! the same core's critical-section counter, not acquiring a new lock.

pub mod critical;
pub mod exclusive;
