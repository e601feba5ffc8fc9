//! Constants and limits for the EZPack wire format

#[cfg(feature = "std")]
use std::time::Duration;

/// Start-of-frame marker
pub const START_BYTE: u8 = 0xAA;

/// End-of-frame marker
pub const END_BYTE: u8 = 0x55;

/// Bytes before the payload: START + type + length
pub const HEADER_SIZE: usize = 3;

/// Bytes after the payload: checksum + END
pub const TRAILER_SIZE: usize = 2;

/// Offset of the packet type byte
pub const TYPE_OFFSET: usize = 1;

/// Offset of the payload length byte
pub const LENGTH_OFFSET: usize = 2;

/// Smallest valid frame (empty payload)
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + TRAILER_SIZE;

/// The length field is a single byte
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;

/// Largest valid frame (255-byte payload)
pub const MAX_FRAME_SIZE: usize = MIN_FRAME_SIZE + MAX_PAYLOAD_SIZE;

/// Upper bound of a single wait for transport data while receiving
#[cfg(feature = "std")]
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Shortest wait the extractor will request between polls
#[cfg(feature = "std")]
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Initial capacity of the extractor's accumulation buffer
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Total on-wire size of a frame carrying `payload_len` bytes
pub const fn frame_size(payload_len: usize) -> usize {
    MIN_FRAME_SIZE + payload_len
}
