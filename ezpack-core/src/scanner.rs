//! Stream scanner for captured, possibly damaged, byte streams
//!
//! Frame boundaries are found textually: the first START byte, then the
//! next END byte strictly after it. The length byte is never trusted to
//! locate the end of a frame, only to validate a window once found. A
//! window that fails validation is skipped through its END byte.

use crate::decoder::{try_parse_frame, try_parse_frame_zero_copy};
use crate::constants::{END_BYTE, START_BYTE};
use crate::types::Packet;
use alloc::vec::Vec;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Boundaries of a candidate frame window inside a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Index of the START byte
    pub start: usize,

    /// Index of the END byte (inclusive)
    pub end: usize,
}

impl Candidate {
    /// Number of bytes in the window
    pub fn size(&self) -> usize {
        self.end - self.start + 1
    }

    /// Bytes consumed from the front of the buffer when this window is resolved
    pub fn consumed(&self) -> usize {
        self.end + 1
    }
}

/// Position of the first START byte in `buf`
pub fn find_start(buf: &[u8]) -> Option<usize> {
    memchr::memchr(START_BYTE, buf)
}

/// Find the first candidate window in `buf`
///
/// Returns `None` when there is no START byte, or no END byte after it yet.
pub fn find_candidate(buf: &[u8]) -> Option<Candidate> {
    let start = find_start(buf)?;
    let rel = memchr::memchr(END_BYTE, &buf[start + 1..])?;
    Some(Candidate {
        start,
        end: start + 1 + rel,
    })
}

/// A packet found at a specific offset in the stream
#[derive(Debug, Clone)]
pub struct LocatedPacket {
    /// Byte offset of the frame's START byte
    pub offset: usize,

    /// The decoded packet
    pub packet: Packet,

    /// Total size of the frame in bytes
    pub size: usize,
}

/// Scan a byte stream for valid frames, even if the stream is damaged
///
/// This applies the same resynchronization policy as the live extractor:
/// 1. Locate the first START byte and the next END byte after it
/// 2. Validate the window between them
/// 3. Report the packet if valid, otherwise drop the window
/// 4. Resume scanning after the END byte
pub fn scan_stream(data: &[u8]) -> Vec<LocatedPacket> {
    scan_stream_with_stats(data).0
}

/// Scan statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Total bytes scanned
    pub bytes_scanned: usize,

    /// Number of START..END windows examined
    pub candidates_found: usize,

    /// Number of valid packets found
    pub packets_found: usize,

    /// Windows with a bad checksum
    pub checksum_failures: usize,

    /// Windows that were not a well-formed frame
    pub format_failures: usize,

    /// Total bytes recovered (sum of all valid frame sizes)
    pub bytes_recovered: usize,
}

impl ScanStats {
    /// Calculate recovery rate as a percentage
    pub fn recovery_rate(&self) -> f64 {
        if self.bytes_scanned == 0 {
            0.0
        } else {
            (self.bytes_recovered as f64 / self.bytes_scanned as f64) * 100.0
        }
    }

    /// Total number of windows dropped
    pub fn failures(&self) -> usize {
        self.checksum_failures + self.format_failures
    }
}

/// Scan stream with statistics
pub fn scan_stream_with_stats(data: &[u8]) -> (Vec<LocatedPacket>, ScanStats) {
    let mut stats = ScanStats {
        bytes_scanned: data.len(),
        ..Default::default()
    };
    let mut results = Vec::new();
    let mut pos = 0;

    #[cfg(feature = "logging")]
    debug!("Starting stream scan of {} bytes", data.len());

    while let Some(rel) = find_candidate(&data[pos..]) {
        let start = pos + rel.start;
        let end = pos + rel.end;
        stats.candidates_found += 1;

        match try_parse_frame(&data[start..=end]) {
            Ok(packet) => {
                let size = end - start + 1;
                stats.bytes_recovered += size;
                results.push(LocatedPacket {
                    offset: start,
                    packet,
                    size,
                });
            }
            Err(e) => {
                #[cfg(feature = "logging")]
                warn!("Dropping frame window at offset {}: {}", start, e);

                if e.is_corruption() {
                    stats.checksum_failures += 1;
                } else {
                    stats.format_failures += 1;
                }
            }
        }

        pos = end + 1;
    }

    stats.packets_found = results.len();

    #[cfg(feature = "logging")]
    debug!(
        "Scan complete: found {} valid packets out of {} bytes scanned",
        stats.packets_found, stats.bytes_scanned
    );

    (results, stats)
}

/// Scan a byte buffer (Bytes) and return zero-copy packets by slicing
pub fn scan_stream_zero_copy(buf: Bytes) -> Vec<LocatedPacket> {
    let mut results = Vec::new();
    let mut pos = 0;
    while let Some(rel) = find_candidate(&buf[pos..]) {
        let start = pos + rel.start;
        let end = pos + rel.end;
        if let Ok(packet) = try_parse_frame_zero_copy(buf.slice(start..=end)) {
            results.push(LocatedPacket {
                offset: start,
                packet,
                size: end - start + 1,
            });
        }
        pos = end + 1;
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode_packet;

    #[test]
    fn test_find_candidate() {
        assert_eq!(find_candidate(&[0x00, 0x55, 0x01]), None);
        assert_eq!(find_candidate(&[0x00, 0xAA, 0x01]), None);
        // END before START does not count
        assert_eq!(
            find_candidate(&[0x55, 0xAA, 0x01, 0x55]),
            Some(Candidate { start: 1, end: 3 })
        );
        let c = find_candidate(&[0x10, 0xAA, 0x01, 0x00, 0x01, 0x55, 0x99]).unwrap();
        assert_eq!(c, Candidate { start: 1, end: 5 });
        assert_eq!(c.size(), 5);
        assert_eq!(c.consumed(), 6);
    }

    #[test]
    fn test_scan_clean_stream() {
        let mut stream = Vec::new();
        for i in 1..=3u8 {
            stream.extend_from_slice(&encode_packet(i, &[i, i + 1]).unwrap());
        }

        let results = scan_stream(&stream);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].packet.packet_type, 1);
        assert_eq!(results[1].offset, 7);
        assert_eq!(results[2].packet.payload.as_ref(), &[3, 4]);
    }

    #[test]
    fn test_scan_with_corruption() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&encode_packet(0x01, b"one").unwrap());
        stream.extend_from_slice(b"GARBAGE DATA HERE!!!");
        // Corrupt frame: wrong checksum
        stream.extend_from_slice(&[0xAA, 0x01, 0x02, 0xBE, 0xEF, 0x00, 0x55]);
        stream.extend_from_slice(&encode_packet(0x02, b"two").unwrap());

        let (results, stats) = scan_stream_with_stats(&stream);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].packet.payload.as_ref(), b"one");
        assert_eq!(results[1].packet.payload.as_ref(), b"two");
        assert_eq!(stats.checksum_failures, 1);
        assert_eq!(stats.packets_found, 2);
    }

    #[test]
    fn test_scan_end_byte_inside_payload() {
        // 0x55 in the payload closes the window early; the frame is lost
        let frame = encode_packet(0x01, &[0x10, 0x55, 0x20]).unwrap();
        let (results, stats) = scan_stream_with_stats(&frame);

        assert!(results.is_empty());
        assert_eq!(stats.format_failures, 1);
    }

    #[test]
    fn test_scan_stats() {
        let frame = encode_packet(0x07, b"test").unwrap();
        let (results, stats) = scan_stream_with_stats(&frame);

        assert_eq!(results.len(), 1);
        assert_eq!(stats.packets_found, 1);
        assert_eq!(stats.bytes_scanned, frame.len());
        assert!(stats.recovery_rate() > 99.0);
    }

    #[test]
    fn test_scan_zero_copy() {
        let mut stream = Vec::new();
        stream.extend_from_slice(b"noise");
        stream.extend_from_slice(&encode_packet(0x03, b"abc").unwrap());
        let results = scan_stream_zero_copy(Bytes::from(stream));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].offset, 5);
        assert_eq!(results[0].packet.payload.as_ref(), b"abc");
    }
}
