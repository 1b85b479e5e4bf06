//! Capture and playback as one unit.
//!
//! Start is two-phase: drivers are installed before either task spawns.
//! Stop is the mirror image: both tasks are dead before a driver is torn
//! down, so a task can never touch a released peripheral.

use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use proto::frame::{self, FrameHeader};
use state::{AmpReason, BodyState};
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::amp::AmpControl;
use crate::filter::SignalChain;
use crate::peripheral::{AudioError, AudioInput, AudioOutput, SourceKind};
use crate::BLOCK_SAMPLES;

/// Network and timing parameters of one pipeline.
#[derive(Clone, Copy, Debug)]
pub struct AudioConfig {
    /// Destination port on the peer for framed microphone datagrams.
    pub peer_audio_port: u16,
    /// Local port for inbound speaker datagrams; 0 picks an ephemeral one.
    pub listen_port: u16,
    pub block_samples: usize,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl Default for AudioConfig {
    fn default() -> AudioConfig {
        AudioConfig {
            peer_audio_port: proto::AUDIO_OUT_PORT,
            listen_port: proto::AUDIO_IN_PORT,
            block_samples: BLOCK_SAMPLES,
            read_timeout: Duration::from_millis(100),
            write_timeout: Duration::from_millis(100),
        }
    }
}

/// The capture/playback task pair. Started and stopped together; neither
/// direction ever runs without the other.
struct StreamTasks {
    capture: tokio::task::JoinHandle<()>,
    playback: tokio::task::JoinHandle<()>,
}

impl StreamTasks {
    /// Abort both tasks and wait until each has actually exited.
    async fn shutdown(self) {
        self.capture.abort();
        self.playback.abort();
        let _ = self.capture.await;
        let _ = self.playback.await;
    }
}

/// The audio subsystem. One instance lives for the whole process; the
/// outbound sequence counter therefore survives stop/start cycles and
/// resets only on reboot.
pub struct AudioPipeline {
    cfg: AudioConfig,
    state: Arc<BodyState>,
    input: Arc<dyn AudioInput>,
    output: Arc<dyn AudioOutput>,
    amp: Arc<AmpControl>,
    seq: Arc<AtomicU32>,
    epoch: Instant,
    tasks: tokio::sync::Mutex<Option<StreamTasks>>,
    playback_addr: std::sync::Mutex<Option<SocketAddr>>,
}

impl AudioPipeline {
    pub fn new(
        cfg: AudioConfig,
        state: Arc<BodyState>,
        input: Arc<dyn AudioInput>,
        output: Arc<dyn AudioOutput>,
        amp: Arc<AmpControl>,
    ) -> AudioPipeline {
        AudioPipeline {
            cfg,
            state,
            input,
            output,
            amp,
            seq: Arc::new(AtomicU32::new(0)),
            epoch: Instant::now(),
            tasks: tokio::sync::Mutex::new(None),
            playback_addr: std::sync::Mutex::new(None),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.streaming.load(Ordering::Acquire)
    }

    /// Next outbound sequence number.
    pub fn sequence(&self) -> u32 {
        self.seq.load(Ordering::Relaxed)
    }

    /// Local address of the speaker socket while streaming.
    pub fn playback_addr(&self) -> Option<SocketAddr> {
        *self.playback_addr.lock().unwrap()
    }

    /// Install drivers, then launch both tasks. Returns `false` without
    /// side effects when already streaming.
    pub async fn start(&self, peer: IpAddr) -> Result<bool, AudioError> {
        let mut tasks = self.tasks.lock().await;
        if tasks.is_some() {
            debug!("audio start ignored; already streaming");
            return Ok(false);
        }

        self.input.install().await?;
        if let Err(e) = self.output.install().await {
            self.input.uninstall().await;
            return Err(e);
        }
        let (mic_sock, speaker_sock) = match self.bind_sockets(peer).await {
            Ok(pair) => pair,
            Err(e) => {
                self.input.uninstall().await;
                self.output.uninstall().await;
                return Err(e.into());
            }
        };
        *self.playback_addr.lock().unwrap() = Some(speaker_sock.local_addr()?);

        *tasks = Some(StreamTasks {
            capture: tokio::spawn(capture_task(
                self.input.clone(),
                mic_sock,
                self.seq.clone(),
                self.epoch,
                self.cfg.block_samples,
                self.cfg.read_timeout,
            )),
            playback: tokio::spawn(playback_task(
                self.output.clone(),
                self.amp.clone(),
                speaker_sock,
                self.cfg.block_samples,
                self.cfg.write_timeout,
            )),
        });
        self.state.streaming.store(true, Ordering::Release);
        info!(%peer, "audio streaming started");
        Ok(true)
    }

    /// Terminate both tasks, then tear down the drivers. Idempotent:
    /// returns `false` when nothing was running.
    pub async fn stop(&self) -> bool {
        let mut tasks = self.tasks.lock().await;
        let Some(group) = tasks.take() else {
            debug!("audio stop while inactive; nothing to do");
            return false;
        };
        self.state.streaming.store(false, Ordering::Release);
        // Both tasks must be dead before the drivers go away.
        group.shutdown().await;
        self.input.uninstall().await;
        self.output.uninstall().await;
        *self.playback_addr.lock().unwrap() = None;

        self.amp.retract(AmpReason::AudioIn).await;
        info!("audio streaming stopped");
        true
    }

    async fn bind_sockets(&self, peer: IpAddr) -> std::io::Result<(UdpSocket, UdpSocket)> {
        let mic_sock = UdpSocket::bind(("0.0.0.0", 0)).await?;
        mic_sock.connect((peer, self.cfg.peer_audio_port)).await?;
        let speaker_sock = UdpSocket::bind(("0.0.0.0", self.cfg.listen_port)).await?;
        Ok((mic_sock, speaker_sock))
    }
}

/// Microphone loop: read, condition, frame, send. A failed read is
/// retried on the next iteration; the sequence number advances only when
/// a packet actually went out.
async fn capture_task(
    input: Arc<dyn AudioInput>,
    sock: UdpSocket,
    seq: Arc<AtomicU32>,
    epoch: Instant,
    block_samples: usize,
    read_timeout: Duration,
) {
    let mut raw = vec![0u16; block_samples];
    let mut chain = SignalChain::new();
    loop {
        match input.read_block(&mut raw, read_timeout).await {
            Ok(0) => {}
            Ok(n) => {
                let pcm = match input.kind() {
                    SourceKind::Analog => chain.condition(&raw[..n]),
                    SourceKind::Digital => raw[..n].iter().map(|&x| x as i16).collect(),
                };
                let header = FrameHeader {
                    seq: seq.load(Ordering::Relaxed),
                    millis: epoch.elapsed().as_millis() as u32,
                };
                match sock.send(&frame::encode_frame(header, &pcm)).await {
                    Ok(_) => {
                        seq.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => debug!(error = %e, "mic datagram send failed"),
                }
            }
            Err(e) => debug!(error = %e, "capture read failed; retrying"),
        }
    }
}

/// Speaker loop: receive, truncate to one block, write. The first packet
/// of a session holds the amplifier line through the gate.
async fn playback_task(
    output: Arc<dyn AudioOutput>,
    amp: Arc<AmpControl>,
    sock: UdpSocket,
    block_samples: usize,
    write_timeout: Duration,
) {
    // recvfrom truncates anything longer than one block.
    let mut buf = vec![0u8; block_samples * 2];
    let mut first = true;
    loop {
        match sock.recv_from(&mut buf).await {
            Ok((n, _from)) => {
                if first {
                    first = false;
                    amp.assert(AmpReason::AudioIn).await;
                    info!("first speaker packet; amplifier held on");
                }
                let pcm = frame::pcm_from_bytes(&buf[..n]);
                if let Err(e) = output.write_block(&pcm, write_timeout).await {
                    debug!(error = %e, "playback write failed; block dropped");
                }
            }
            Err(e) => debug!(error = %e, "speaker socket recv failed"),
        }
    }
}
