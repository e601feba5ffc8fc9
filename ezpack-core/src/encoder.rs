//! Frame encoding

use crate::constants::{frame_size, END_BYTE, MAX_PAYLOAD_SIZE, START_BYTE};
use crate::error::FrameError;
use crate::types::Packet;
use alloc::string::String;
use bytes::{BufMut, Bytes, BytesMut};
use core::fmt::Write;

#[cfg(feature = "logging")]
use tracing::debug;

/// Compute the one-byte XOR checksum of a packet
///
/// The type byte is XORed with the payload length, then with every
/// payload byte from left to right. Building and validating both go
/// through this function.
pub fn compute_checksum(packet_type: u8, payload: &[u8]) -> u8 {
    // Truncation matches the one-byte length field; oversized payloads
    // never reach the wire.
    payload
        .iter()
        .fold(packet_type ^ payload.len() as u8, |acc, b| acc ^ b)
}

/// Encode a packet into a frame
///
/// The frame is encoded with the following layout:
/// 1. START (1 byte): 0xAA
/// 2. Type (1 byte)
/// 3. Length (1 byte): payload length, 0-255
/// 4. Payload (`length` bytes)
/// 5. Checksum (1 byte): see [`compute_checksum`]
/// 6. END (1 byte): 0x55
pub fn encode_packet(packet_type: u8, payload: &[u8]) -> Result<Bytes, FrameError> {
    let mut buf = BytesMut::with_capacity(frame_size(payload.len().min(MAX_PAYLOAD_SIZE)));
    encode_packet_into(packet_type, payload, &mut buf)?;
    let frame = buf.freeze();

    #[cfg(feature = "logging")]
    debug!("Frame built: {}", format_frame(&frame));

    Ok(frame)
}

/// Append an encoded frame to `buf`
///
/// Nothing is written if the payload is too long.
pub fn encode_packet_into(
    packet_type: u8,
    payload: &[u8],
    buf: &mut BytesMut,
) -> Result<(), FrameError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::InvalidPayloadLength(payload.len()));
    }

    buf.reserve(frame_size(payload.len()));
    buf.put_u8(START_BYTE);
    buf.put_u8(packet_type);
    buf.put_u8(payload.len() as u8);
    buf.put_slice(payload);
    buf.put_u8(compute_checksum(packet_type, payload));
    buf.put_u8(END_BYTE);

    Ok(())
}

/// Encode a complete Packet struct
pub fn encode_packet_struct(packet: &Packet) -> Result<Bytes, FrameError> {
    encode_packet(packet.packet_type, &packet.payload)
}

/// Render frame bytes as upper-case, space-separated hex (`AA 01 02 ...`)
pub fn format_frame(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 3);
    for (i, b) in data.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // Writing into a String cannot fail
        let _ = write!(out, "{:02X}", b);
    }
    out
}

/// Builder for constructing packets
pub struct PacketBuilder {
    packet_type: u8,
    payload: BytesMut,
}

impl PacketBuilder {
    /// Create a new packet builder
    pub fn new(packet_type: u8) -> Self {
        Self {
            packet_type,
            payload: BytesMut::new(),
        }
    }

    /// Replace the payload
    pub fn payload(mut self, payload: &[u8]) -> Self {
        self.payload.clear();
        self.payload.put_slice(payload);
        self
    }

    /// Append a single byte to the payload
    pub fn push(mut self, byte: u8) -> Self {
        self.payload.put_u8(byte);
        self
    }

    /// Append bytes to the payload
    pub fn extend(mut self, bytes: &[u8]) -> Self {
        self.payload.put_slice(bytes);
        self
    }

    /// Build and encode the frame
    pub fn build(self) -> Result<Bytes, FrameError> {
        encode_packet(self.packet_type, &self.payload)
    }

    /// Build the packet struct without encoding
    pub fn build_packet(self) -> Result<Packet, FrameError> {
        let packet = Packet::new(self.packet_type, self.payload.freeze());
        packet.validate()?;
        Ok(packet)
    }
}
