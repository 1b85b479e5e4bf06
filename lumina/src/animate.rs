//! Cosmetic animation tickers.
//!
//! These run beside the control loop and never block it: each iteration
//! is a handful of state reads and one render or servo write.

use std::sync::Arc;
use std::time::Duration;

use motion::MotionController;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use state::{BodyState, Expression, Mood, Rgb};
use tokio::time;

use crate::face::Face;
use crate::lamp::Lamp;

/// While talking, randomise the mouth shape and nudge the tilt servo a
/// few degrees so the head moves with the voice.
pub async fn talk_ticker(
    state: Arc<BodyState>,
    motion: Arc<MotionController>,
    face: Arc<dyn Face>,
    period: Duration,
) {
    let mut ticker = time::interval(period);
    let mut rng = StdRng::from_entropy();
    loop {
        ticker.tick().await;
        if state.expression() != Expression::Talking {
            continue;
        }
        let frame = rng.gen_range(0..3u8);
        let wiggle = rng.gen_range(-3i8..=3);
        motion.wiggle_tilt(wiggle).await;
        face.render(Expression::Talking, state.mood(), frame).await;
    }
}

/// While asleep, scroll the idle marquee.
pub async fn idle_marquee(state: Arc<BodyState>, face: Arc<dyn Face>, period: Duration) {
    let mut ticker = time::interval(period);
    let mut offset: u16 = 0;
    loop {
        ticker.tick().await;
        if state.expression() != Expression::Sleep {
            continue;
        }
        offset = offset.wrapping_add(2);
        face.marquee(offset).await;
    }
}

/// The lamp breathes: each tick rescales the current mood color by a
/// slow sine level. The stored mood is never touched, so commands always
/// see their own values.
pub async fn breath_ticker(state: Arc<BodyState>, lamp: Arc<dyn Lamp>, period: Duration) {
    let mut ticker = time::interval(period);
    let mut phase: u8 = 0;
    loop {
        ticker.tick().await;
        phase = phase.wrapping_add(2);
        let mood = state.mood();
        let shown = Mood {
            color: scale(mood.color, breath_level(phase)),
            brightness: mood.brightness,
        };
        lamp.show(shown).await;
    }
}

/// Breathing level for one phase step: 80..=165 out of 255.
pub fn breath_level(phase: u8) -> u8 {
    let s = (phase as f32 / 256.0 * std::f32::consts::TAU).sin();
    ((s * 127.5 + 127.5) as u8) / 3 + 80
}

/// Scale a color channel-wise by `level / 256`.
fn scale(color: Rgb, level: u8) -> Rgb {
    let s = |c: u8| ((c as u16 * level as u16) >> 8) as u8;
    Rgb::new(s(color.r), s(color.g), s(color.b))
}

/// Positional servo tick: one degree toward the commanded gaze target.
pub async fn motion_ticker(state: Arc<BodyState>, motion: Arc<MotionController>, period: Duration) {
    let mut ticker = time::interval(period);
    loop {
        ticker.tick().await;
        let gaze = state.gaze();
        motion.step_toward(gaze.pan, gaze.tilt).await;
    }
}
