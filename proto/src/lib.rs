//! Wire protocol for the Lumina body unit.
//!
//! Everything the body says or understands lives here: the line-oriented
//! command grammar, the fixed reply strings, and the framing of outbound
//! audio datagrams. This crate is pure — no sockets, no clocks — so the
//! grammar can be exercised without a runtime.

pub mod command;
pub mod frame;
pub mod reply;

pub use command::{Axis, BurstDir, Command};
pub use frame::{FrameHeader, HEADER_LEN};
pub use reply::Reply;

/// UDP port the body listens on for text commands.
pub const CONTROL_PORT: u16 = 5005;
/// UDP port on the peer that receives framed microphone audio.
pub const AUDIO_OUT_PORT: u16 = 5006;
/// UDP port the body listens on for raw speaker audio.
pub const AUDIO_IN_PORT: u16 = 5007;
