//! Control core of the Lumina body unit.
//!
//! The body is an actuated desk device: a pan/tilt head, a mood lamp, a
//! small face display, a microphone and a speaker. A remote brain drives
//! it with one-line text commands over UDP and exchanges a live audio
//! stream with it. This crate wires the protocol, state, motion, and
//! audio crates into the running device.

pub mod animate;
pub mod dispatcher;
pub mod face;
pub mod lamp;
pub mod logging;
pub mod peer;
pub mod tone;
pub mod touch;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use face::{Face, LoggingFace, NoopFace};
pub use lamp::{Lamp, LoggingLamp, NoopLamp};
pub use peer::PeerSession;
pub use tone::ToneGenerator;
pub use touch::{NoopTouch, TouchSensor};
