//! Command transports: the UDP control socket and the local console.
//!
//! Both deliver trimmed lines to the dispatcher. Only network lines carry
//! an origin; the console can drive everything except replies, which need
//! a learned peer.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UdpSocket;
use tracing::{debug, warn};

use crate::dispatcher::Dispatcher;

/// Receive loop for the control socket. Never returns.
pub async fn udp_listener(socket: Arc<UdpSocket>, dispatcher: Arc<Dispatcher>) {
    let mut buf = [0u8; 256];
    loop {
        match socket.recv_from(&mut buf).await {
            Ok((n, addr)) => {
                let text = String::from_utf8_lossy(&buf[..n]);
                let line = text.trim();
                if line.is_empty() {
                    continue;
                }
                debug!(%addr, %line, "control line");
                dispatcher.handle(line, Some(addr)).await;
            }
            Err(e) => warn!(error = %e, "control socket recv failed"),
        }
    }
}

/// Line loop for stdin, for bench debugging. Returns at EOF.
pub async fn console_listener(dispatcher: Arc<Dispatcher>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        dispatcher.handle(line, None).await;
    }
}
