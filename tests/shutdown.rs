mod common;

use std::panic;

use common::SignalWatcher;
use dualcore_rt::testing::{deep_sleep_entered, set_current_core, EXIT_LOG};
use dualcore_rt::CoreId;

/// Only one core needs to call `shutdown()`; the peer learns about it
/// entirely through its signal handler (see `common::SignalWatcher`),
/// mirroring how the reference firmware's shutdown handshake works.
#[test]
fn shutdown_runs_both_cores_exit_tables_in_order() {
    let _guard = common::lock();
    set_current_core(CoreId::Primary);
    EXIT_LOG.lock().unwrap().clear();

    let secondary_watcher = SignalWatcher::spawn(CoreId::Secondary);

    let result = panic::catch_unwind(|| {
        dualcore_rt::shutdown();
    });
    assert!(result.is_err(), "shutdown() must not return");
    assert!(deep_sleep_entered());

    secondary_watcher.stop();

    let log = EXIT_LOG.lock().unwrap();
    // Primary's own handlers run in table order, then (since Primary is the
    // one that called shutdown()) the MCU-wide table; Secondary's handler
    // runs concurrently via its signal handler and can interleave, but must
    // appear and must stay internally ordered.
    let primary_idx: Vec<_> = log
        .iter()
        .enumerate()
        .filter(|(_, s)| s.starts_with("primary") || s.starts_with("mcu"))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(
        log.iter()
            .filter(|s| s.starts_with("primary") || s.starts_with("mcu"))
            .cloned()
            .collect::<Vec<_>>(),
        vec!["primary[0]", "primary[1]", "mcu[0]"]
    );
    assert!(primary_idx.windows(2).all(|w| w[0] < w[1]));
    assert!(log.iter().any(|s| *s == "secondary[0]"));
}
