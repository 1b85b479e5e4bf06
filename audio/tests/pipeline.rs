use std::collections::VecDeque;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use audio::{
    AmpControl, Amplifier, AudioConfig, AudioError, AudioInput, AudioOutput, AudioPipeline,
    SourceKind,
};
use proto::frame::{FrameHeader, HEADER_LEN};
use state::{AmpReason, BodyState};
use tokio::net::UdpSocket;
use tokio::time::timeout;

const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Capture fake that serves queued blocks, then times out like a stalled
/// peripheral would.
struct ScriptedInput {
    kind: SourceKind,
    blocks: Mutex<VecDeque<Vec<u16>>>,
}

impl ScriptedInput {
    fn digital(blocks: Vec<Vec<u16>>) -> ScriptedInput {
        ScriptedInput {
            kind: SourceKind::Digital,
            blocks: Mutex::new(blocks.into()),
        }
    }

    fn push(&self, block: Vec<u16>) {
        self.blocks.lock().unwrap().push_back(block);
    }
}

#[async_trait]
impl AudioInput for ScriptedInput {
    async fn install(&self) -> Result<(), AudioError> {
        Ok(())
    }

    async fn uninstall(&self) {}

    async fn read_block(&self, buf: &mut [u16], timeout: Duration) -> Result<usize, AudioError> {
        let next = self.blocks.lock().unwrap().pop_front();
        match next {
            Some(block) => {
                let n = block.len().min(buf.len());
                buf[..n].copy_from_slice(&block[..n]);
                Ok(n)
            }
            None => {
                tokio::time::sleep(timeout).await;
                Err(AudioError::Timeout)
            }
        }
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }
}

#[derive(Default)]
struct RecordingOutput {
    blocks: Mutex<Vec<Vec<i16>>>,
    uninstalled: AtomicBool,
}

#[async_trait]
impl AudioOutput for RecordingOutput {
    async fn install(&self) -> Result<(), AudioError> {
        self.uninstalled.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn uninstall(&self) {
        self.uninstalled.store(true, Ordering::SeqCst);
    }

    async fn write_block(&self, pcm: &[i16], _timeout: Duration) -> Result<(), AudioError> {
        self.blocks.lock().unwrap().push(pcm.to_vec());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingAmp {
    line: Mutex<Vec<bool>>,
}

#[async_trait]
impl Amplifier for RecordingAmp {
    async fn set_enabled(&self, enabled: bool) {
        self.line.lock().unwrap().push(enabled);
    }
}

struct Rig {
    pipeline: AudioPipeline,
    state: Arc<BodyState>,
    input: Arc<ScriptedInput>,
    output: Arc<RecordingOutput>,
    amp: Arc<RecordingAmp>,
    brain: UdpSocket,
}

async fn rig(blocks: Vec<Vec<u16>>, block_samples: usize) -> Rig {
    let brain = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let cfg = AudioConfig {
        peer_audio_port: brain.local_addr().unwrap().port(),
        listen_port: 0,
        block_samples,
        read_timeout: Duration::from_millis(20),
        write_timeout: Duration::from_millis(20),
    };
    let state = Arc::new(BodyState::new());
    let input = Arc::new(ScriptedInput::digital(blocks));
    let output = Arc::new(RecordingOutput::default());
    let amp = Arc::new(RecordingAmp::default());
    let control = Arc::new(AmpControl::new(state.clone(), amp.clone()));
    let pipeline = AudioPipeline::new(cfg, state.clone(), input.clone(), output.clone(), control);
    Rig {
        pipeline,
        state,
        input,
        output,
        amp,
        brain,
    }
}

async fn recv_frame(brain: &UdpSocket) -> (FrameHeader, Vec<u8>) {
    let mut buf = [0u8; 2048];
    let n = timeout(Duration::from_secs(2), brain.recv(&mut buf))
        .await
        .expect("timed out waiting for mic datagram")
        .unwrap();
    let header = FrameHeader::parse(&buf[..n]).unwrap();
    (header, buf[HEADER_LEN..n].to_vec())
}

#[tokio::test]
async fn mic_frames_are_sequenced_and_survive_restart() {
    let rig = rig(vec![vec![1, 2], vec![3, 4], vec![5, 6]], 8).await;

    assert!(rig.pipeline.start(LOCALHOST).await.unwrap());
    assert!(rig.pipeline.is_active());

    for expected_seq in 0..3u32 {
        let (header, payload) = recv_frame(&rig.brain).await;
        assert_eq!(header.seq, expected_seq);
        assert_eq!(payload.len(), 4);
    }

    // The counter only advances after a datagram is actually out.
    timeout(Duration::from_secs(2), async {
        while rig.pipeline.sequence() != 3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("sequence counter lagged behind the sent frames");

    assert!(rig.pipeline.stop().await);
    assert!(!rig.pipeline.is_active());

    // The counter is process-wide: a new session keeps counting.
    rig.input.push(vec![7, 8]);
    assert!(rig.pipeline.start(LOCALHOST).await.unwrap());
    let (header, _) = recv_frame(&rig.brain).await;
    assert_eq!(header.seq, 3);
    rig.pipeline.stop().await;
}

#[tokio::test]
async fn digital_payload_is_forwarded_unmodified() {
    let rig = rig(vec![vec![0x0102, 0x8001]], 8).await;
    rig.pipeline.start(LOCALHOST).await.unwrap();

    let (_, payload) = recv_frame(&rig.brain).await;
    // Little-endian PCM, bit-for-bit what the driver produced.
    assert_eq!(payload, vec![0x02, 0x01, 0x01, 0x80]);
    rig.pipeline.stop().await;
}

#[tokio::test]
async fn first_speaker_packet_holds_the_gate_and_blocks_are_truncated() {
    let rig = rig(Vec::new(), 8).await;
    rig.pipeline.start(LOCALHOST).await.unwrap();
    let speaker_port = rig.pipeline.playback_addr().unwrap().port();

    // 12 samples against a block of 8: the excess must be dropped.
    let oversized: Vec<u8> = (0..24).collect();
    rig.brain
        .send_to(&oversized, ("127.0.0.1", speaker_port))
        .await
        .unwrap();

    timeout(Duration::from_secs(2), async {
        loop {
            if !rig.output.blocks.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("speaker block never arrived");

    assert_eq!(rig.output.blocks.lock().unwrap()[0].len(), 8);
    assert!(rig.state.amp.holds(AmpReason::AudioIn));
    assert_eq!(rig.amp.line.lock().unwrap().as_slice(), &[true]);

    // Stop retracts the reason and releases the line.
    assert!(rig.pipeline.stop().await);
    assert!(!rig.state.amp.holds(AmpReason::AudioIn));
    assert_eq!(rig.amp.line.lock().unwrap().last(), Some(&false));
    assert!(rig.output.uninstalled.load(Ordering::SeqCst));
}

#[tokio::test]
async fn stop_while_inactive_is_a_noop() {
    let rig = rig(Vec::new(), 8).await;
    assert!(!rig.pipeline.stop().await);
    assert!(rig.amp.line.lock().unwrap().is_empty());
}

#[tokio::test]
async fn double_start_is_rejected() {
    let rig = rig(Vec::new(), 8).await;
    assert!(rig.pipeline.start(LOCALHOST).await.unwrap());
    assert!(!rig.pipeline.start(LOCALHOST).await.unwrap());
    rig.pipeline.stop().await;
}
