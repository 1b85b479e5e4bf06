//! Shared device state for the Lumina body.
//!
//! One [`BodyState`] is created at boot and lives for the whole process.
//! The control loop, the audio tasks, and the animation tickers all read
//! and write it concurrently, so scalar flags are atomics and composite
//! fields sit behind short-lived mutexes that are never held across an
//! await point.

pub mod amp;
pub mod body;
pub mod expression;
pub mod mood;

pub use amp::{AmpGate, AmpReason};
pub use body::{BodyState, Gaze, ANGLE_MAX, ANGLE_MIN};
pub use expression::Expression;
pub use mood::{named_color, Mood, Rgb};
