//! Error types for EZPack operations

use alloc::string::String;

/// Errors that can occur while building or parsing EZPack frames
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Payload does not fit in the one-byte length field
    #[cfg_attr(feature = "std", error("Invalid payload length: {0} bytes exceeds maximum 255"))]
    InvalidPayloadLength(usize),

    /// Candidate window is shorter than the smallest possible frame
    #[cfg_attr(feature = "std", error("Frame too short: need at least 5 bytes, got {actual}"))]
    TooShort {
        /// The number of bytes in the window.
        actual: usize,
    },

    /// Candidate window does not begin with the start marker
    #[cfg_attr(feature = "std", error("Missing start marker: expected 0xAA, got {0:#04x}"))]
    MissingStart(u8),

    /// Declared payload length disagrees with the window, or the window
    /// does not end with the end marker
    #[cfg_attr(
        feature = "std",
        error("Length mismatch: header declares {declared} payload bytes, window holds {actual}")
    )]
    LengthMismatch {
        /// Payload length from the length byte.
        declared: usize,
        /// Payload bytes actually present between length and checksum.
        actual: usize,
    },

    /// Well-formed frame whose checksum byte is wrong
    #[cfg_attr(
        feature = "std",
        error("Checksum mismatch: expected {expected:#04x}, got {actual:#04x}")
    )]
    ChecksumMismatch {
        /// Checksum recomputed from type, length and payload.
        expected: u8,
        /// Checksum byte carried by the frame.
        actual: u8,
    },

    /// Payload could not be converted to or from a typed value
    #[cfg_attr(feature = "std", error("Serialization error: {0}"))]
    Serialization(String),
}

impl FrameError {
    /// True for integrity failures (corruption), false for format errors
    pub fn is_corruption(&self) -> bool {
        matches!(self, FrameError::ChecksumMismatch { .. })
    }
}

/// Errors crossing the boundary of a live link
///
/// A receive timeout is not an error; it is reported as `Ok(None)`.
#[cfg(feature = "std")]
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The caller asked for a frame that cannot be built
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The transport failed to read or write
    #[error("Transport error: {0}")]
    Transport(#[source] std::io::Error),

    /// The transport can no longer deliver or accept data
    #[error("Transport closed")]
    Closed,
}

#[cfg(feature = "std")]
impl From<std::io::Error> for LinkError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::NotConnected
            | std::io::ErrorKind::BrokenPipe => LinkError::Closed,
            _ => LinkError::Transport(err),
        }
    }
}
