//! The amplifier gate.
//!
//! Several independent contexts want the speaker line on: the talk
//! animation, chat mode, a running tone, and the playback task when the
//! first packet of a session arrives. Instead of racing writers on one
//! flag, each context asserts or retracts a named reason in an atomic
//! bit-set; the line is enabled iff the set is non-empty.

use std::sync::atomic::{AtomicU8, Ordering};

/// A named contributor to the amplifier-enable line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AmpReason {
    Talking = 1 << 0,
    ChatMode = 1 << 1,
    Tone = 1 << 2,
    /// First speaker packet of the current audio session received.
    AudioIn = 1 << 3,
}

/// Atomic reason set reduced by OR. Safe to poke from any task.
#[derive(Debug, Default)]
pub struct AmpGate {
    reasons: AtomicU8,
}

impl AmpGate {
    pub fn new() -> AmpGate {
        AmpGate::default()
    }

    /// Add a reason; returns whether the line is enabled afterwards.
    pub fn assert(&self, reason: AmpReason) -> bool {
        self.reasons.fetch_or(reason as u8, Ordering::AcqRel) | reason as u8 != 0
    }

    /// Drop a reason; returns whether the line is still enabled.
    pub fn retract(&self, reason: AmpReason) -> bool {
        self.reasons.fetch_and(!(reason as u8), Ordering::AcqRel) & !(reason as u8) != 0
    }

    /// True iff any contributor currently holds the line.
    pub fn is_enabled(&self) -> bool {
        self.reasons.load(Ordering::Acquire) != 0
    }

    /// True iff this particular reason is asserted.
    pub fn holds(&self, reason: AmpReason) -> bool {
        self.reasons.load(Ordering::Acquire) & reason as u8 != 0
    }
}
