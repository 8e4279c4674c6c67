/// Tests for the push channel's reconnect gate.
use crate::push::ReconnectGate;

#[test]
fn first_arm_succeeds() {
    let mut gate = ReconnectGate::new();
    assert!(!gate.is_armed());
    assert!(gate.arm());
    assert!(gate.is_armed());
}

#[test]
fn arming_twice_is_rejected() {
    // Close and error handling can both fire for one dropped connection; only
    // one reconnect may be scheduled.
    let mut gate = ReconnectGate::new();
    assert!(gate.arm());
    assert!(!gate.arm());
    assert!(!gate.arm());
}

#[test]
fn close_frame_then_stream_end_schedules_one_reconnect() {
    // The teardown sequence of a single dropped connection: a close frame,
    // then the stream ends. The first event arms (and would log), the second
    // is absorbed; the armed gate drives exactly one reconnect sleep.
    let mut gate = ReconnectGate::new();
    assert!(gate.arm()); // close frame
    assert!(!gate.arm()); // stream end
    assert!(gate.is_armed());
    gate.disarm(); // after the reconnect sleep
    assert!(gate.arm()); // next drop starts a fresh cycle
}

#[test]
fn disarm_allows_the_next_cycle() {
    let mut gate = ReconnectGate::new();
    assert!(gate.arm());
    gate.disarm();
    assert!(!gate.is_armed());
    assert!(gate.arm());
}
