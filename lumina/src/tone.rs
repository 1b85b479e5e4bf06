//! Scheduled tone playback.
//!
//! The tone runs as its own cancellable task so the control loop stays
//! responsive while it plays. The amplifier is held through the gate's
//! `Tone` reason for the full requested duration and released afterwards,
//! whatever other contributors are doing.

use std::sync::Arc;
use std::time::Duration;

use audio::{AmpControl, AudioOutput, BLOCK_SAMPLES, SAMPLE_RATE_HZ};
use state::AmpReason;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Square wave level; loud but well clear of full scale.
const TONE_AMPLITUDE: i16 = 12_000;
const WRITE_TIMEOUT: Duration = Duration::from_millis(100);

pub struct ToneGenerator {
    amp: Arc<AmpControl>,
    output: Arc<dyn AudioOutput>,
    current: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl ToneGenerator {
    pub fn new(amp: Arc<AmpControl>, output: Arc<dyn AudioOutput>) -> ToneGenerator {
        ToneGenerator {
            amp,
            output,
            current: tokio::sync::Mutex::new(None),
        }
    }

    /// Start a tone, cancelling any tone already playing. Returns as soon
    /// as the task is scheduled.
    pub async fn play(&self, freq_hz: u32, duration: Duration) {
        let mut current = self.current.lock().await;
        if let Some(old) = current.take() {
            old.abort();
            let _ = old.await;
        }

        self.amp.assert(AmpReason::Tone).await;
        debug!(freq_hz, ?duration, "tone scheduled");

        let amp = self.amp.clone();
        let output = self.output.clone();
        *current = Some(tokio::spawn(async move {
            let started = Instant::now();
            synth(output.as_ref(), freq_hz, duration).await;
            // The line stays up for the full duration even when the
            // output driver accepts blocks faster than real time.
            if let Some(remaining) = duration.checked_sub(started.elapsed()) {
                tokio::time::sleep(remaining).await;
            }
            amp.retract(AmpReason::Tone).await;
        }));
    }
}

/// Write a square wave at `freq_hz` to the output, block by block.
async fn synth(output: &dyn AudioOutput, freq_hz: u32, duration: Duration) {
    let total = (duration.as_secs_f32() * SAMPLE_RATE_HZ as f32) as usize;
    let half_period = (SAMPLE_RATE_HZ / (2 * freq_hz.max(1))).max(1) as usize;
    let mut block = vec![0i16; BLOCK_SAMPLES];
    let mut level = TONE_AMPLITUDE;
    let mut phase = 0usize;
    let mut sent = 0usize;
    while sent < total {
        let n = BLOCK_SAMPLES.min(total - sent);
        for sample in block[..n].iter_mut() {
            *sample = level;
            phase += 1;
            if phase >= half_period {
                phase = 0;
                level = -level;
            }
        }
        if let Err(e) = output.write_block(&block[..n], WRITE_TIMEOUT).await {
            debug!(error = %e, "tone write failed; block dropped");
        }
        sent += n;
    }
}
