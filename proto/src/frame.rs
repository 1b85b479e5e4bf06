//! Framing of the microphone stream.
//!
//! Each outbound datagram carries an 8-byte header — big-endian sequence
//! number and big-endian milliseconds since boot — followed by the block's
//! little-endian 16-bit PCM samples. The speaker stream in the other
//! direction is raw PCM with no header.

use thiserror::Error;

/// Bytes of header preceding the PCM payload.
pub const HEADER_LEN: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame truncated: {len} bytes, need at least {HEADER_LEN}")]
    Truncated { len: usize },
}

/// Header of one microphone datagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHeader {
    /// Monotonically increasing per-packet counter; wraps on overflow.
    pub seq: u32,
    /// Milliseconds since process start, wrapping.
    pub millis: u32,
}

impl FrameHeader {
    /// Serialize to the 8-byte wire form.
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[..4].copy_from_slice(&self.seq.to_be_bytes());
        out[4..].copy_from_slice(&self.millis.to_be_bytes());
        out
    }

    /// Parse the header off the front of a datagram.
    pub fn parse(buf: &[u8]) -> Result<FrameHeader, FrameError> {
        if buf.len() < HEADER_LEN {
            return Err(FrameError::Truncated { len: buf.len() });
        }
        let seq = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let millis = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);
        Ok(FrameHeader { seq, millis })
    }
}

/// Build one outbound datagram: header then little-endian PCM.
pub fn encode_frame(header: FrameHeader, pcm: &[i16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + pcm.len() * 2);
    out.extend_from_slice(&header.encode());
    for sample in pcm {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    out
}

/// Decode raw little-endian PCM bytes. A trailing odd byte is dropped.
pub fn pcm_from_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}
