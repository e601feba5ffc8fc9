//! A packet link over one transport
//!
//! [`PacketLink`] is the per-stream owner of a transport handle and the
//! extractor that reassembles packets from it. One link serves one stream;
//! there is no shared or global state between links.

use crate::encoder::encode_packet;
use crate::error::LinkError;
use crate::extractor::{ExtractorConfig, ExtractorStats, StreamExtractor};
use crate::transport::Transport;
use crate::types::Packet;
use bytes::Bytes;
use std::time::Duration;

#[cfg(feature = "logging")]
use crate::encoder::format_frame;
#[cfg(feature = "logging")]
use tracing::{debug, info};

/// Sends and receives EZPack packets over a transport
#[derive(Debug)]
pub struct PacketLink<T> {
    transport: T,
    extractor: StreamExtractor,
}

impl<T: Transport> PacketLink<T> {
    /// Create a link with the default extractor configuration
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ExtractorConfig::default())
    }

    /// Create a link with an explicit extractor configuration
    pub fn with_config(transport: T, config: ExtractorConfig) -> Self {
        Self {
            transport,
            extractor: StreamExtractor::with_config(config),
        }
    }

    /// Build a frame and write it to the transport
    ///
    /// An oversized payload is rejected before anything is written.
    /// Returns the frame that was sent.
    pub fn send_packet(&mut self, packet_type: u8, payload: &[u8]) -> Result<Bytes, LinkError> {
        let frame = encode_packet(packet_type, payload)?;
        self.transport.write_all(&frame)?;

        #[cfg(feature = "logging")]
        debug!("Sent packet: {}", format_frame(&frame));

        Ok(frame)
    }

    /// Send a packet struct
    pub fn send(&mut self, packet: &Packet) -> Result<Bytes, LinkError> {
        self.send_packet(packet.packet_type, &packet.payload)
    }

    /// Wait for the next valid packet
    ///
    /// `Ok(None)` means the timeout elapsed; see [`StreamExtractor::receive`].
    pub fn receive_packet(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Option<Packet>, LinkError> {
        self.extractor.receive(&mut self.transport, timeout)
    }

    /// Extractor counters for this link
    pub fn stats(&self) -> &ExtractorStats {
        self.extractor.stats()
    }

    /// Borrow the extractor (e.g. to install a discard hook)
    pub fn extractor_mut(&mut self) -> &mut StreamExtractor {
        &mut self.extractor
    }

    /// Borrow the underlying transport
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying transport
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Close the transport and hand it back
    pub fn close(mut self) -> Result<T, LinkError> {
        self.transport.close()?;

        #[cfg(feature = "logging")]
        info!(
            "Link closed ({} packets received, {} bytes still buffered)",
            self.extractor.stats().packets_received,
            self.extractor.buffered()
        );

        Ok(self.transport)
    }
}
