mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;

use common::SignalWatcher;
use dualcore_rt::testing::set_current_core;
use dualcore_rt::{enter_exclusive, exit_exclusive, CoreId, Errc};

/// Two cores racing to enter the same exclusive section must never
/// observe each other's critical increment interleaved.
#[test]
fn mutual_exclusion_holds_under_contention() {
    let _guard = common::lock();
    let shared = Arc::new(AtomicU32::new(0));
    let iterations = 200u32;

    let primary_watcher = SignalWatcher::spawn(CoreId::Primary);
    let secondary_watcher = SignalWatcher::spawn(CoreId::Secondary);

    let worker = |core: CoreId, shared: Arc<AtomicU32>| {
        set_current_core(core);
        for _ in 0..iterations {
            enter_exclusive().expect("enter_exclusive should not time out");
            let before = shared.load(Ordering::SeqCst);
            thread::yield_now();
            shared.store(before + 1, Ordering::SeqCst);
            exit_exclusive().expect("exit_exclusive should not error");
        }
    };

    let s1 = Arc::clone(&shared);
    let s2 = Arc::clone(&shared);
    let t1 = thread::spawn(move || worker(CoreId::Primary, s1));
    let t2 = thread::spawn(move || worker(CoreId::Secondary, s2));

    t1.join().unwrap();
    t2.join().unwrap();

    primary_watcher.stop();
    secondary_watcher.stop();

    assert_eq!(shared.load(Ordering::SeqCst), iterations * 2);
}

/// If the peer holds the lock and never releases it, `enter_exclusive`
/// must time out rather than hang, and must leave no residue the next
/// caller would trip over.
#[test]
fn enter_times_out_when_peer_holds_lock_and_never_acks() {
    let _guard = common::lock();
    // Needed so Secondary's own acquire below completes: it still waits on
    // Primary's ack after the CAS succeeds, same as any fresh acquire.
    let primary_watcher = SignalWatcher::spawn(CoreId::Primary);

    set_current_core(CoreId::Secondary);
    assert_eq!(enter_exclusive(), Ok(()));

    set_current_core(CoreId::Primary);
    // Secondary holds the lock, so Primary's attempt loops in the
    // acquisition CAS — observing Secondary's tag, never 0 — until it
    // times out; it never reaches the ack-wait phase at all.
    assert_eq!(enter_exclusive(), Err(Errc::Timeout));

    set_current_core(CoreId::Secondary);
    exit_exclusive().unwrap();

    // Only safe to stop now: the watcher's handler blocks on the lock
    // word until Secondary releases it above.
    primary_watcher.stop();
}
