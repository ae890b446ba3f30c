//! Inter-core signal handler: the code each core's signal-event interrupt
//! vector runs in response to the peer executing `sev` (from
//! [`crate::lifecycle::shutdown`] or the exclusive-section CAS loop in
//! [`crate::sync::exclusive::enter`]).
//!
//! Board support wires this up as the actual interrupt handler; it must
//! run at a priority above the critical-section mask, since its whole job
//! is to make progress while the peer holds a critical/exclusive section
//! against it.

use crate::core_id::current_core;
use crate::lifecycle;
use crate::sync::{critical, exclusive};

/// Entry point for the inter-core signal-event interrupt.
///
/// First checks whether the peer is shutting down and, if so, joins the
/// shutdown (never returns in that case). Otherwise, acknowledges any
/// exclusive section the peer currently holds against this core: the ack
/// flag is held high for the entire span the peer holds the lock, not
/// just the first loop iteration, so the holder can't observe a spurious
/// drop and time out on [`crate::sync::exclusive::exit`] while this core
/// is still faithfully parked.
pub fn on_peer_signal() {
    critical::enter();
    let this = current_core();
    if lifecycle::shutdown_flag(this.peer()).load() == 1 {
        lifecycle::shutdown_flag(this).store(1);
        lifecycle::execute_shutdown(this);
    }
    let _ = critical::exit();

    critical::enter();
    let peer_tag = this.peer().tag() as u32;
    while exclusive::lock_word().load() == peer_tag {
        exclusive::ack_flag(this).store(1);
    }
    exclusive::ack_flag(this).store(0);
    let _ = critical::exit();
}
