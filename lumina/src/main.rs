use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use audio::{AmpControl, AudioConfig, AudioPipeline, DiscardOutput, LoggingAmplifier, SilenceInput};
use clap::Parser;
use lumina::dispatcher::Dispatcher;
use lumina::face::{Face, LoggingFace};
use lumina::lamp::{Lamp, LoggingLamp};
use lumina::peer::{heartbeat_loop, PeerSession};
use lumina::touch::{self, NoopTouch};
use lumina::{animate, logging, transport};
use motion::{LoggingServos, MotionController};
use state::BodyState;
use tokio::net::UdpSocket;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Address to bind the control and audio sockets
    #[arg(long, env = "LUMINA_BIND", default_value = "0.0.0.0")]
    bind: IpAddr,
    /// Control channel port
    #[arg(long, env = "LUMINA_CONTROL_PORT", default_value_t = proto::CONTROL_PORT)]
    control_port: u16,
    /// Local port for inbound speaker audio
    #[arg(long, default_value_t = proto::AUDIO_IN_PORT)]
    audio_in_port: u16,
    /// Destination port on the peer for microphone audio
    #[arg(long, default_value_t = proto::AUDIO_OUT_PORT)]
    audio_out_port: u16,
    /// Samples per audio block
    #[arg(long, default_value_t = audio::BLOCK_SAMPLES)]
    block_samples: usize,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    let socket = Arc::new(
        UdpSocket::bind((cli.bind, cli.control_port))
            .await
            .context("binding control socket")?,
    );
    info!(addr = %socket.local_addr()?, "control channel up");

    let state = Arc::new(BodyState::new());
    let session = Arc::new(PeerSession::new(socket.clone()));

    // Headless rig: every peripheral logs instead of touching hardware.
    // Real builds swap these for the board drivers.
    let face = Arc::new(LoggingFace);
    let lamp = Arc::new(LoggingLamp);
    let amp = Arc::new(AmpControl::new(state.clone(), Arc::new(LoggingAmplifier)));
    let input = Arc::new(SilenceInput);
    let output = Arc::new(DiscardOutput);

    let motion = Arc::new(MotionController::new(Arc::new(LoggingServos)));
    motion.enable().await;

    let audio_cfg = AudioConfig {
        peer_audio_port: cli.audio_out_port,
        listen_port: cli.audio_in_port,
        block_samples: cli.block_samples,
        ..AudioConfig::default()
    };
    let pipeline = Arc::new(AudioPipeline::new(
        audio_cfg,
        state.clone(),
        input,
        output.clone(),
        amp.clone(),
    ));

    let dispatcher = Arc::new(Dispatcher::new(
        state.clone(),
        session.clone(),
        motion.clone(),
        pipeline,
        face.clone(),
        lamp.clone(),
        amp,
        output,
    ));

    // Boot pose.
    face.render(state.expression(), state.mood(), 0).await;
    lamp.show(state.mood()).await;

    tokio::spawn(heartbeat_loop(
        session,
        state.clone(),
        Duration::from_millis(500),
    ));
    tokio::spawn(animate::talk_ticker(
        state.clone(),
        motion.clone(),
        face.clone(),
        Duration::from_millis(150),
    ));
    tokio::spawn(animate::idle_marquee(
        state.clone(),
        face,
        Duration::from_millis(100),
    ));
    tokio::spawn(animate::breath_ticker(
        state.clone(),
        lamp,
        Duration::from_millis(20),
    ));
    tokio::spawn(animate::motion_ticker(
        state,
        motion,
        Duration::from_millis(15),
    ));
    tokio::spawn(touch::touch_ticker(
        Arc::new(NoopTouch),
        dispatcher.clone(),
        Duration::from_millis(25),
        touch::TOUCH_DEBOUNCE,
    ));
    tokio::spawn(transport::console_listener(dispatcher.clone()));

    info!("lumina body ready");
    transport::udp_listener(socket, dispatcher).await;
    Ok(())
}
