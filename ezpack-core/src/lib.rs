//! # EZPack Core
//!
//! A minimal framed packet protocol for unreliable byte links such as a UART.
//!
//! Every packet travels as `[0xAA][type][length][payload...][checksum][0x55]`,
//! where the checksum is the XOR of the type, the length and every payload byte.
//!
//! ## Modules
//!
//! - `constants`: Wire format constants and limits
//! - `types`: Core types (Packet, EzpackSerializable)
//! - `encoder`: Checksum and frame building
//! - `decoder`: Strict parsing of a single frame window
//! - `scanner`: Offline scanning of captured byte streams
//! - `transport`: Byte-stream collaborator trait and adapters (std)
//! - `extractor`: Stateful, timeout-bounded frame extraction (std)
//! - `link`: Per-stream owner of a transport and its extractor (std)

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
#[cfg(feature = "std")]
pub mod extractor;
#[cfg(feature = "std")]
pub mod link;
pub mod scanner;
#[cfg(feature = "std")]
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use decoder::try_parse_frame;
pub use encoder::{compute_checksum, encode_packet};
pub use error::FrameError;
#[cfg(feature = "std")]
pub use error::LinkError;
#[cfg(feature = "std")]
pub use extractor::{ExtractorConfig, StreamExtractor};
#[cfg(feature = "std")]
pub use link::PacketLink;
#[cfg(feature = "std")]
pub use transport::Transport;
pub use types::{EzpackSerializable, Packet};

/// Result type alias for EZPack codec operations
pub type Result<T> = core::result::Result<T, FrameError>;
