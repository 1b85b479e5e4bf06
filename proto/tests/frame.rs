use proto::frame::{encode_frame, pcm_from_bytes, FrameError, FrameHeader, HEADER_LEN};

#[test]
fn header_layout_is_big_endian() {
    let header = FrameHeader {
        seq: 0x0102_0304,
        millis: 0x0A0B_0C0D,
    };
    assert_eq!(
        header.encode(),
        [0x01, 0x02, 0x03, 0x04, 0x0A, 0x0B, 0x0C, 0x0D]
    );
}

#[test]
fn payload_is_little_endian_pcm() {
    let header = FrameHeader { seq: 0, millis: 0 };
    let frame = encode_frame(header, &[0x0102, -1]);
    assert_eq!(frame.len(), HEADER_LEN + 4);
    assert_eq!(&frame[HEADER_LEN..], &[0x02, 0x01, 0xFF, 0xFF]);
}

#[test]
fn parse_round_trips() {
    let header = FrameHeader {
        seq: 42,
        millis: 123_456,
    };
    let frame = encode_frame(header, &[1, 2, 3]);
    assert_eq!(FrameHeader::parse(&frame), Ok(header));
}

#[test]
fn short_buffer_is_rejected() {
    assert_eq!(
        FrameHeader::parse(&[0, 1, 2]),
        Err(FrameError::Truncated { len: 3 })
    );
}

#[test]
fn raw_pcm_drops_trailing_odd_byte() {
    assert_eq!(pcm_from_bytes(&[0x02, 0x01, 0xFF]), vec![0x0102]);
}
