use state::{AmpGate, AmpReason};

#[test]
fn disabled_until_first_reason() {
    let gate = AmpGate::new();
    assert!(!gate.is_enabled());
    assert!(gate.assert(AmpReason::Talking));
    assert!(gate.is_enabled());
}

#[test]
fn enabled_iff_reason_set_nonempty() {
    let gate = AmpGate::new();
    gate.assert(AmpReason::Talking);
    gate.assert(AmpReason::ChatMode);

    // Dropping one contributor keeps the line up.
    assert!(gate.retract(AmpReason::Talking));
    assert!(gate.is_enabled());

    // Dropping the last one releases it.
    assert!(!gate.retract(AmpReason::ChatMode));
    assert!(!gate.is_enabled());
}

#[test]
fn assert_and_retract_are_idempotent() {
    let gate = AmpGate::new();
    gate.assert(AmpReason::Tone);
    gate.assert(AmpReason::Tone);
    assert!(!gate.retract(AmpReason::Tone));
    assert!(!gate.retract(AmpReason::Tone));
    assert!(!gate.is_enabled());
}

#[test]
fn holds_tracks_individual_reasons() {
    let gate = AmpGate::new();
    gate.assert(AmpReason::AudioIn);
    assert!(gate.holds(AmpReason::AudioIn));
    assert!(!gate.holds(AmpReason::Tone));
}

#[test]
fn concurrent_contributors_converge() {
    use std::sync::Arc;
    use std::thread;

    let gate = Arc::new(AmpGate::new());
    let mut handles = Vec::new();
    for reason in [AmpReason::Talking, AmpReason::ChatMode, AmpReason::Tone] {
        let gate = gate.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..1000 {
                gate.assert(reason);
                gate.retract(reason);
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }
    assert!(!gate.is_enabled());
}
