//! The two-way audio pipeline.
//!
//! Capture reads microphone blocks, conditions them, frames them, and
//! sends one datagram per block to the brain. Playback receives raw PCM
//! datagrams and writes them to the speaker. The two tasks are started
//! and stopped as a unit and share nothing but the device state and the
//! amplifier gate.

pub mod amp;
pub mod filter;
pub mod peripheral;
pub mod pipeline;

pub use amp::AmpControl;
pub use filter::{SignalChain, SOFT_CLAMP};
pub use peripheral::{
    Amplifier, AudioError, AudioInput, AudioOutput, DiscardOutput, LoggingAmplifier, SilenceInput,
    SourceKind,
};
pub use pipeline::{AudioConfig, AudioPipeline};

/// PCM sample rate of both directions, Hz.
pub const SAMPLE_RATE_HZ: u32 = 16_000;
/// Samples per block, both directions.
pub const BLOCK_SAMPLES: usize = 512;
