use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use dualcore_rt::testing::{set_current_core, take_pending_signal};
use dualcore_rt::{on_peer_signal, CoreId};

/// The runtime's lock/nesting/ack statics are process-global; `cargo test`
/// runs every `#[test]` in this binary on its own thread by default, so
/// each test takes this before touching shared state.
static GLOBAL: Mutex<()> = Mutex::new(());

pub fn lock() -> MutexGuard<'static, ()> {
    GLOBAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Spawns a background "interrupt controller" for `core`: polls for a
/// pending signal event posted by the peer and, when one arrives, pins
/// this watcher thread to `core`'s identity and runs the signal handler —
/// standing in for the real hardware delivering the inter-core interrupt.
///
/// Returns a handle whose `drop`-free `stop()` must be called before the
/// test ends, since the watcher loop only checks the stop flag between
/// polls.
pub struct SignalWatcher {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SignalWatcher {
    pub fn spawn(core: CoreId) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            set_current_core(core);
            while !stop_clone.load(Ordering::SeqCst) {
                if take_pending_signal(core) {
                    on_peer_signal();
                }
                thread::sleep(Duration::from_micros(200));
            }
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
