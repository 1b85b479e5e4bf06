//! The fixed set of status strings the body sends back to the brain.

use std::fmt;

/// Every message the body ever emits on the control channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Discovery handshake response.
    Identity,
    Pong,
    StatusListening,
    StatusMute,
    HeartbeatListening,
    HeartbeatMute,
    AudioStreaming,
    AudioStopped,
}

impl Reply {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reply::Identity => "LUMINA_BODY",
            Reply::Pong => "PONG",
            Reply::StatusListening => "STATUS:LISTENING",
            Reply::StatusMute => "STATUS:MUTE",
            Reply::HeartbeatListening => "HEARTBEAT:LISTENING",
            Reply::HeartbeatMute => "HEARTBEAT:MUTE",
            Reply::AudioStreaming => "AUDIO:STREAMING",
            Reply::AudioStopped => "AUDIO:STOPPED",
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
