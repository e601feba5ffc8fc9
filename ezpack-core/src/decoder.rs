//! Frame decoding (strict mode)

use crate::constants::{
    END_BYTE, HEADER_SIZE, LENGTH_OFFSET, MIN_FRAME_SIZE, START_BYTE, TRAILER_SIZE, TYPE_OFFSET,
};
use crate::encoder::compute_checksum;
use crate::error::FrameError;
use crate::types::Packet;
use bytes::Bytes;
use core::ops::Range;

/// Parse one candidate window into a packet
///
/// The window must span exactly one frame: it starts at a START byte and
/// ends at the END byte that closes it. Validation order:
/// - at least 5 bytes, else `TooShort`
/// - first byte is START, else `MissingStart`
/// - exactly `length` payload bytes and a trailing END, else `LengthMismatch`
/// - checksum matches, else `ChecksumMismatch`
pub fn try_parse_frame(window: &[u8]) -> Result<Packet, FrameError> {
    let (packet_type, payload) = validate_window(window)?;
    Ok(Packet::new(packet_type, Bytes::copy_from_slice(&window[payload])))
}

/// Parse a candidate window without copying the payload
///
/// The returned packet's payload is a slice of `buf`.
pub fn try_parse_frame_zero_copy(buf: Bytes) -> Result<Packet, FrameError> {
    let (packet_type, payload) = validate_window(&buf)?;
    Ok(Packet::new(packet_type, buf.slice(payload)))
}

/// Validate a window, returning the type byte and the payload range
fn validate_window(window: &[u8]) -> Result<(u8, Range<usize>), FrameError> {
    if window.len() < MIN_FRAME_SIZE {
        return Err(FrameError::TooShort {
            actual: window.len(),
        });
    }

    if window[0] != START_BYTE {
        return Err(FrameError::MissingStart(window[0]));
    }

    let declared = window[LENGTH_OFFSET] as usize;
    let actual = window.len() - MIN_FRAME_SIZE;
    if declared != actual || window[window.len() - 1] != END_BYTE {
        return Err(FrameError::LengthMismatch { declared, actual });
    }

    let packet_type = window[TYPE_OFFSET];
    let payload = HEADER_SIZE..window.len() - TRAILER_SIZE;
    let carried = window[payload.end];
    let expected = compute_checksum(packet_type, &window[payload.clone()]);
    if carried != expected {
        return Err(FrameError::ChecksumMismatch {
            expected,
            actual: carried,
        });
    }

    Ok((packet_type, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode_packet;

    #[test]
    fn test_decode_simple_frame() {
        let packet = try_parse_frame(&[0xAA, 0x01, 0x02, 0xAA, 0xAA, 0x03, 0x55]).unwrap();
        assert_eq!(packet.packet_type, 0x01);
        assert_eq!(packet.payload.as_ref(), &[0xAA, 0xAA]);
    }

    #[test]
    fn test_decode_empty_payload() {
        let packet = try_parse_frame(&[0xAA, 0x42, 0x00, 0x42, 0x55]).unwrap();
        assert_eq!(packet, Packet::empty(0x42));
    }

    #[test]
    fn test_decode_too_short() {
        assert_eq!(
            try_parse_frame(&[0xAA, 0x01, 0x55]),
            Err(FrameError::TooShort { actual: 3 })
        );
    }

    #[test]
    fn test_decode_missing_start() {
        assert_eq!(
            try_parse_frame(&[0x00, 0x01, 0x00, 0x01, 0x55]),
            Err(FrameError::MissingStart(0x00))
        );
    }

    #[test]
    fn test_decode_length_mismatch() {
        // Declares 3 payload bytes, carries 2
        assert_eq!(
            try_parse_frame(&[0xAA, 0x01, 0x03, 0xBE, 0xEF, 0x52, 0x55]),
            Err(FrameError::LengthMismatch {
                declared: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_decode_missing_end() {
        assert!(matches!(
            try_parse_frame(&[0xAA, 0x01, 0x02, 0xBE, 0xEF, 0x52, 0x00]),
            Err(FrameError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_bad_checksum() {
        // Checksum byte from a frame that was captured with the wrong value
        assert_eq!(
            try_parse_frame(&[0xAA, 0x01, 0x02, 0xBE, 0xEF, 0x00, 0x55]),
            Err(FrameError::ChecksumMismatch {
                expected: 0x52,
                actual: 0x00
            })
        );
    }

    #[test]
    fn test_zero_copy_shares_buffer() {
        let encoded = encode_packet(0x05, b"hello").unwrap();
        let packet = try_parse_frame_zero_copy(encoded.clone()).unwrap();
        assert_eq!(packet.payload.as_ref(), b"hello");
        assert_eq!(packet.payload.as_ptr(), encoded[3..].as_ptr());
    }
}
