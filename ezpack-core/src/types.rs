//! Core types for EZPack packets

use crate::constants::{frame_size, MAX_PAYLOAD_SIZE};
use crate::encoder::{compute_checksum, encode_packet};
use crate::error::FrameError;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use bytes::Bytes;

/// A decoded packet: a caller-defined type byte and its payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Packet {
    /// Packet type (meaning is up to the application)
    pub packet_type: u8,

    /// Packet payload, at most 255 bytes on the wire
    pub payload: Bytes,
}

impl Packet {
    /// Create a new packet
    pub fn new(packet_type: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            packet_type,
            payload: payload.into(),
        }
    }

    /// Create a packet with no payload
    pub fn empty(packet_type: u8) -> Self {
        Self::new(packet_type, Bytes::new())
    }

    /// Check that the payload fits in a single frame
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::InvalidPayloadLength(self.payload.len()));
        }
        Ok(())
    }

    /// Checksum this packet carries on the wire
    pub fn checksum(&self) -> u8 {
        compute_checksum(self.packet_type, &self.payload)
    }

    /// Total size of the encoded frame in bytes
    pub fn frame_size(&self) -> usize {
        frame_size(self.payload.len())
    }

    /// Encode this packet into a frame
    pub fn encode(&self) -> Result<Bytes, FrameError> {
        encode_packet(self.packet_type, &self.payload)
    }

    /// Decode the payload into a typed value
    pub fn payload_as<T: EzpackSerializable>(&self) -> Result<T, FrameError> {
        T::from_payload(&self.payload)
    }
}

/// Trait for types that can travel as an EZPack payload
pub trait EzpackSerializable {
    /// Serialize this value into payload bytes
    fn to_payload(&self) -> Result<Bytes, FrameError>;

    /// Deserialize from payload bytes
    fn from_payload(bytes: &[u8]) -> Result<Self, FrameError>
    where
        Self: Sized;
}

fn checked(bytes: Bytes) -> Result<Bytes, FrameError> {
    if bytes.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::InvalidPayloadLength(bytes.len()));
    }
    Ok(bytes)
}

impl EzpackSerializable for Vec<u8> {
    fn to_payload(&self) -> Result<Bytes, FrameError> {
        checked(Bytes::copy_from_slice(self))
    }

    fn from_payload(bytes: &[u8]) -> Result<Self, FrameError> {
        Ok(bytes.to_vec())
    }
}

impl EzpackSerializable for Bytes {
    fn to_payload(&self) -> Result<Bytes, FrameError> {
        checked(self.clone())
    }

    fn from_payload(bytes: &[u8]) -> Result<Self, FrameError> {
        Ok(Bytes::copy_from_slice(bytes))
    }
}

impl EzpackSerializable for String {
    fn to_payload(&self) -> Result<Bytes, FrameError> {
        checked(Bytes::copy_from_slice(self.as_bytes()))
    }

    fn from_payload(bytes: &[u8]) -> Result<Self, FrameError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| FrameError::Serialization(e.to_string()))
    }
}
