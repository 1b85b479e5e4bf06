//! Hardware seams for the audio path.
//!
//! Real builds wire in I2S/ADC drivers; headless runs use the logging and
//! silence implementations here, and tests substitute recording fakes.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::SAMPLE_RATE_HZ;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("driver install failed: {0}")]
    Install(String),
    #[error("peripheral read timed out")]
    Timeout,
    #[error("peripheral i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// Kind of capture front end. Analog sources go through the conditioning
/// chain; digital sources are forwarded untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Analog,
    Digital,
}

/// Microphone driver.
#[async_trait]
pub trait AudioInput: Send + Sync {
    /// Install the driver. Must complete before the capture task starts.
    async fn install(&self) -> Result<(), AudioError>;
    /// Tear the driver down. Only called after the capture task is dead.
    async fn uninstall(&self);
    /// Fill `buf` with raw unsigned samples, blocking at most `timeout`.
    /// Returns the number of samples read.
    async fn read_block(&self, buf: &mut [u16], timeout: Duration) -> Result<usize, AudioError>;
    fn kind(&self) -> SourceKind;
}

/// Speaker driver.
#[async_trait]
pub trait AudioOutput: Send + Sync {
    async fn install(&self) -> Result<(), AudioError>;
    async fn uninstall(&self);
    /// Write one PCM block, blocking at most `timeout`.
    async fn write_block(&self, pcm: &[i16], timeout: Duration) -> Result<(), AudioError>;
}

/// The single enable line in front of the speaker.
#[async_trait]
pub trait Amplifier: Send + Sync {
    async fn set_enabled(&self, enabled: bool);
}

/// [`Amplifier`] that logs transitions. Used when running headless.
#[derive(Clone, Default)]
pub struct LoggingAmplifier;

#[async_trait]
impl Amplifier for LoggingAmplifier {
    async fn set_enabled(&self, enabled: bool) {
        debug!(enabled, "amplifier line");
    }
}

/// [`AudioInput`] that produces silence at the real block cadence, so a
/// headless body still paces its capture loop like hardware would.
#[derive(Clone, Default)]
pub struct SilenceInput;

#[async_trait]
impl AudioInput for SilenceInput {
    async fn install(&self) -> Result<(), AudioError> {
        Ok(())
    }

    async fn uninstall(&self) {}

    async fn read_block(&self, buf: &mut [u16], _timeout: Duration) -> Result<usize, AudioError> {
        let pace = Duration::from_micros(buf.len() as u64 * 1_000_000 / SAMPLE_RATE_HZ as u64);
        tokio::time::sleep(pace).await;
        buf.fill(0x8000);
        Ok(buf.len())
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Analog
    }
}

/// [`AudioOutput`] that accepts and drops every block.
#[derive(Clone, Default)]
pub struct DiscardOutput;

#[async_trait]
impl AudioOutput for DiscardOutput {
    async fn install(&self) -> Result<(), AudioError> {
        Ok(())
    }

    async fn uninstall(&self) {}

    async fn write_block(&self, _pcm: &[i16], _timeout: Duration) -> Result<(), AudioError> {
        Ok(())
    }
}
