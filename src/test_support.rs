//! Serializes unit tests that touch the crate's process-global state
//! (lock words, nesting counters, the mock BASEPRI array). `cargo test`
//! runs tests on separate OS threads by default; without this, two tests
//! setting `CoreId::Primary` on different threads at the same time would
//! stomp on each other's view of the "same" core's shared statics.

use std::sync::{Mutex, MutexGuard};

static GLOBAL: Mutex<()> = Mutex::new(());

pub(crate) fn lock() -> MutexGuard<'static, ()> {
    GLOBAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
