//! Maps parsed commands onto the device.
//!
//! One handler per verb, each idempotent and side-effecting; the only
//! output a sender ever sees is an optional status string through the
//! peer session. Anything malformed beyond the grammar's tolerance is
//! handled locally: clamp, reject-with-log, or ignore.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use audio::{AmpControl, AudioOutput, AudioPipeline};
use motion::MotionController;
use proto::{Command, Reply};
use state::{named_color, AmpReason, BodyState, Expression, Rgb};
use tracing::{debug, warn};

use crate::face::Face;
use crate::lamp::Lamp;
use crate::peer::PeerSession;
use crate::tone::ToneGenerator;

pub struct Dispatcher {
    state: Arc<BodyState>,
    session: Arc<PeerSession>,
    motion: Arc<MotionController>,
    pipeline: Arc<AudioPipeline>,
    face: Arc<dyn Face>,
    lamp: Arc<dyn Lamp>,
    amp: Arc<AmpControl>,
    tone: ToneGenerator,
}

impl Dispatcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: Arc<BodyState>,
        session: Arc<PeerSession>,
        motion: Arc<MotionController>,
        pipeline: Arc<AudioPipeline>,
        face: Arc<dyn Face>,
        lamp: Arc<dyn Lamp>,
        amp: Arc<AmpControl>,
        output: Arc<dyn AudioOutput>,
    ) -> Dispatcher {
        let tone = ToneGenerator::new(amp.clone(), output);
        Dispatcher {
            state,
            session,
            motion,
            pipeline,
            face,
            lamp,
            amp,
            tone,
        }
    }

    /// Dispatch one trimmed line. `origin` is the network sender, if any;
    /// console lines carry no origin and never update the peer session.
    pub async fn handle(&self, line: &str, origin: Option<SocketAddr>) {
        if let Some(addr) = origin {
            self.session.learn(addr);
        }

        match Command::parse(line) {
            Command::Discover => self.session.send_status(Reply::Identity).await,
            Command::Ping => self.session.send_status(Reply::Pong).await,

            Command::TalkStart => {
                self.state.talking.store(true, Ordering::Release);
                self.amp.assert(AmpReason::Talking).await;
                self.state.set_expression(Expression::Talking);
                self.render().await;
            }
            Command::TalkStop => {
                self.state.talking.store(false, Ordering::Release);
                self.amp.retract(AmpReason::Talking).await;
                self.state.set_expression(Expression::Happy);
                self.render().await;
            }
            Command::Happy => {
                self.state.locked.store(true, Ordering::Release);
                self.state.set_expression(Expression::Happy);
                self.render().await;
            }
            Command::Sleep => {
                self.state.chat_mode.store(false, Ordering::Release);
                self.state.talking.store(false, Ordering::Release);
                self.state.locked.store(false, Ordering::Release);
                self.amp
                    .retract_all(&[AmpReason::Talking, AmpReason::ChatMode])
                    .await;
                let mood = self.state.reset_mood();
                self.state.set_expression(Expression::Sleep);
                self.render().await;
                self.lamp.show(mood).await;
            }
            Command::Listening => {
                let mood = self.state.set_color(Rgb::ATTENTIVE);
                self.state.set_expression(Expression::Listening);
                self.render().await;
                self.lamp.show(mood).await;
            }
            Command::Sad => {
                self.state.set_expression(Expression::Sad);
                self.render().await;
            }
            Command::Love => {
                let mood = self.state.set_color(Rgb::LOVE);
                self.state.set_expression(Expression::Love);
                self.render().await;
                self.lamp.show(mood).await;
            }

            Command::ChatStart => self.chat_start().await,
            Command::ChatStop => self.chat_stop().await,

            Command::AudioStart => {
                let Some(peer) = self.session.peer_addr() else {
                    warn!("AUDIO_START ignored; no peer learned");
                    return;
                };
                match self.pipeline.start(peer.ip()).await {
                    Ok(true) => self.session.send_status(Reply::AudioStreaming).await,
                    Ok(false) => {}
                    Err(e) => warn!(error = %e, "audio start failed"),
                }
            }
            Command::AudioStop => {
                if self.pipeline.stop().await {
                    self.session.send_status(Reply::AudioStopped).await;
                }
            }

            Command::Gaze { pan, tilt } => {
                let gaze = self.state.set_gaze(pan, tilt);
                self.state.locked.store(true, Ordering::Release);
                debug!(pan = gaze.pan, tilt = gaze.tilt, "gaze target");
            }
            Command::Brightness(raw) => {
                let mood = self.state.set_brightness(raw);
                self.lamp.show(mood).await;
            }
            Command::BrightnessPercent(raw) => {
                let mood = self.state.set_brightness_percent(raw);
                self.lamp.show(mood).await;
            }
            Command::Color { r, g, b } => {
                let color = Rgb::new(
                    r.clamp(0, 255) as u8,
                    g.clamp(0, 255) as u8,
                    b.clamp(0, 255) as u8,
                );
                let mood = self.state.set_color(color);
                self.lamp.show(mood).await;
            }
            Command::NamedColor(name) => match named_color(&name) {
                Some(color) => {
                    let mood = self.state.set_color(color);
                    self.lamp.show(mood).await;
                }
                // Reference behaviour: an unknown name changes nothing.
                None => debug!(%name, "unknown color name; ignored"),
            },

            Command::Tone {
                freq_hz,
                duration_ms,
            } => {
                let freq = freq_hz.max(0) as u32;
                let duration = Duration::from_millis(duration_ms.max(0) as u64);
                self.tone.play(freq, duration).await;
            }

            Command::ServoEnable => self.motion.enable().await,
            Command::ServoDisable => self.motion.disable().await,
            Command::ServoStop => self.motion.stop().await,
            Command::Calibrate { axis, us } => {
                self.motion.calibrate(axis, us);
            }
            Command::Speed(v) => {
                self.motion.set_speed(v);
            }
            Command::MoveDuration(v) => {
                self.motion.set_move_duration(v);
            }
            Command::Nudge { axis, dir } => self.motion.nudge(axis, dir).await,

            Command::Unknown => debug!(%line, "unrecognized command ignored"),
        }
    }

    /// Enter chat mode. Shared by `CHAT_START` and the touch toggle.
    pub async fn chat_start(&self) {
        self.state.chat_mode.store(true, Ordering::Release);
        self.amp.assert(AmpReason::ChatMode).await;
        let mood = self.state.set_color(Rgb::ATTENTIVE);
        self.state.set_expression(Expression::Listening);
        self.render().await;
        self.lamp.show(mood).await;
        self.session.send_status(Reply::StatusListening).await;
    }

    /// Leave chat mode. Shared by `CHAT_STOP` and the touch toggle.
    pub async fn chat_stop(&self) {
        self.state.chat_mode.store(false, Ordering::Release);
        self.state.talking.store(false, Ordering::Release);
        self.amp
            .retract_all(&[AmpReason::Talking, AmpReason::ChatMode])
            .await;
        let mood = self.state.reset_mood();
        self.state.set_expression(Expression::Sleep);
        self.render().await;
        self.lamp.show(mood).await;
        self.session.send_status(Reply::StatusMute).await;
    }

    /// Flip chat mode; the touch sensor's edge handler lands here.
    pub async fn toggle_chat(&self) {
        if self.state.chat_mode.load(Ordering::Acquire) {
            self.chat_stop().await;
        } else {
            self.chat_start().await;
        }
    }

    async fn render(&self) {
        self.face
            .render(self.state.expression(), self.state.mood(), 0)
            .await;
    }
}
