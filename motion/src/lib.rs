//! Servo motion for the Lumina head.
//!
//! Two modes, per the two servo classes the body ships with:
//! positional servos are stepped one degree per tick toward the commanded
//! target, and continuous-rotation servos are driven with timed pulse
//! bursts around a calibrated neutral pulse width.

pub mod controller;
pub mod servo;

pub use controller::{MotionController, Tuning};
pub use servo::{LoggingServos, NoopServos, ServoBank};
