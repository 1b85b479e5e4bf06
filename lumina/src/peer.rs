//! The remote brain, as the body sees it.
//!
//! The body never dials out: it learns the brain's address from the first
//! inbound command and answers to whoever spoke last. There is no
//! disconnect detection: once learned, the peer stays connected until
//! reboot.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use proto::Reply;
use state::BodyState;
use tokio::net::UdpSocket;
use tokio::time;
use tracing::{debug, info};

/// Last known peer and the socket used to talk back to it.
pub struct PeerSession {
    socket: Arc<UdpSocket>,
    addr: Mutex<Option<SocketAddr>>,
    connected: AtomicBool,
}

impl PeerSession {
    pub fn new(socket: Arc<UdpSocket>) -> PeerSession {
        PeerSession {
            socket,
            addr: Mutex::new(None),
            connected: AtomicBool::new(false),
        }
    }

    /// Record (or overwrite) the peer address from an inbound datagram.
    pub fn learn(&self, addr: SocketAddr) {
        let mut known = self.addr.lock().unwrap();
        if *known != Some(addr) {
            info!(%addr, "peer learned");
        }
        *known = Some(addr);
        self.connected.store(true, Ordering::Release);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        *self.addr.lock().unwrap()
    }

    /// Fire-and-forget status to the last known peer. Skipped silently
    /// when no peer has ever spoken; send failures are logged and dropped.
    pub async fn send_status(&self, reply: Reply) {
        let Some(addr) = self.peer_addr() else {
            debug!(%reply, "status dropped; no peer learned");
            return;
        };
        if let Err(e) = self.socket.send_to(reply.as_str().as_bytes(), addr).await {
            debug!(%reply, error = %e, "status send failed");
        }
    }
}

/// Unsolicited heartbeat to the peer at a fixed cadence, advertising
/// whether the body is listening.
pub async fn heartbeat_loop(session: Arc<PeerSession>, state: Arc<BodyState>, period: Duration) {
    let mut ticker = time::interval(period);
    loop {
        ticker.tick().await;
        if !session.is_connected() {
            continue;
        }
        let reply = if state.chat_mode.load(Ordering::Acquire) {
            Reply::HeartbeatListening
        } else {
            Reply::HeartbeatMute
        };
        session.send_status(reply).await;
    }
}
