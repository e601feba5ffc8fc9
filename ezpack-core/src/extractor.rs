//! Stateful frame extraction from a live byte stream
//!
//! A [`StreamExtractor`] owns the accumulation buffer for exactly one
//! stream. Bytes are appended as the transport delivers them; whenever a
//! START..END window is present it is resolved, either into a packet or
//! into discarded bytes, and removed from the front of the buffer.
//!
//! Corrupt and malformed windows never reach the caller of
//! [`StreamExtractor::receive`]. They are visible only through
//! [`ExtractorStats`] and the optional discard hook.

use crate::constants::{DEFAULT_BUFFER_CAPACITY, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
use crate::decoder::try_parse_frame_zero_copy;
use crate::error::{FrameError, LinkError};
use crate::scanner::{find_candidate, find_start};
use crate::transport::Transport;
use crate::types::Packet;
use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

#[cfg(feature = "logging")]
use crate::encoder::format_frame;
#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Extractor configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Longest single wait for transport data; never exceeds the time left
    /// before a receive deadline. Raised to [`MIN_POLL_INTERVAL`] if smaller.
    pub poll_interval: Duration,

    /// Initial capacity of the accumulation buffer
    pub initial_capacity: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            initial_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl ExtractorConfig {
    /// Create a default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the poll interval, no shorter than [`MIN_POLL_INTERVAL`]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Set the initial buffer capacity
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

/// Counters describing what an extractor has seen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorStats {
    /// Valid packets handed to the caller
    pub packets_received: u64,

    /// Windows dropped because the checksum did not match
    pub checksum_failures: u64,

    /// Windows dropped because they were not a well-formed frame
    pub format_failures: u64,

    /// Bytes removed from the buffer without producing a packet
    pub bytes_discarded: u64,

    /// Receive calls that ended without a packet
    pub timeouts: u64,
}

/// Why bytes were dropped from the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    /// Bytes before any START marker
    Noise,

    /// A candidate window (and anything before it) that failed to parse
    Invalid(FrameError),
}

/// Bytes dropped during resynchronization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardEvent {
    /// Why they were dropped
    pub reason: DiscardReason,

    /// The dropped bytes
    pub bytes: Bytes,
}

type DiscardHook = Box<dyn FnMut(&DiscardEvent) + Send>;

/// Reassembles packets from a fragmented, possibly corrupted byte stream
pub struct StreamExtractor {
    buf: BytesMut,
    config: ExtractorConfig,
    stats: ExtractorStats,
    on_discard: Option<DiscardHook>,
}

impl Default for StreamExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StreamExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamExtractor")
            .field("buffered", &self.buf.len())
            .field("config", &self.config)
            .field("stats", &self.stats)
            .field("on_discard", &self.on_discard.is_some())
            .finish()
    }
}

impl StreamExtractor {
    /// Create an extractor with default configuration
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    /// Create an extractor with explicit configuration
    pub fn with_config(mut config: ExtractorConfig) -> Self {
        config.poll_interval = config.poll_interval.max(MIN_POLL_INTERVAL);
        Self {
            buf: BytesMut::with_capacity(config.initial_capacity),
            config,
            stats: ExtractorStats::default(),
            on_discard: None,
        }
    }

    /// Current configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Counters accumulated since creation or the last reset
    pub fn stats(&self) -> &ExtractorStats {
        &self.stats
    }

    /// Zero all counters
    pub fn reset_stats(&mut self) {
        self.stats = ExtractorStats::default();
    }

    /// Register a callback invoked for every discarded byte range
    pub fn set_discard_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&DiscardEvent) + Send + 'static,
    {
        self.on_discard = Some(Box::new(hook));
    }

    /// Remove the discard callback
    pub fn clear_discard_hook(&mut self) {
        self.on_discard = None;
    }

    /// Number of bytes waiting in the buffer
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Bytes waiting in the buffer
    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    /// Drop everything buffered
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Append bytes obtained outside of [`receive`](Self::receive)
    pub fn extend(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Extract the next valid packet from the buffer, without any I/O
    ///
    /// Invalid windows are discarded along the way. Returns `None` when the
    /// buffer holds no complete START..END window.
    pub fn next_packet(&mut self) -> Option<Packet> {
        loop {
            let Some(candidate) = find_candidate(&self.buf) else {
                self.drop_leading_noise();
                return None;
            };

            if candidate.start > 0 {
                let noise = self.buf.split_to(candidate.start).freeze();
                self.discard(DiscardReason::Noise, noise);
            }

            let window = self.buf.split_to(candidate.size()).freeze();
            match try_parse_frame_zero_copy(window.clone()) {
                Ok(packet) => {
                    self.stats.packets_received += 1;

                    #[cfg(feature = "logging")]
                    debug!("Received valid packet: {}", format_frame(&window));

                    return Some(packet);
                }
                Err(e) => {
                    #[cfg(feature = "logging")]
                    warn!("Discarding frame ({}): {}", e, format_frame(&window));

                    self.discard(DiscardReason::Invalid(e), window);
                }
            }
        }
    }

    /// Wait for the next valid packet from `transport`
    ///
    /// Returns `Ok(Some(packet))` as soon as a valid frame is assembled and
    /// `Ok(None)` once `timeout` elapses without one. `None` as timeout waits
    /// indefinitely. A zero timeout polls the transport once without waiting.
    /// Only transport failures are reported as errors; bytes already
    /// buffered stay buffered for the next call.
    pub fn receive<T>(
        &mut self,
        transport: &mut T,
        timeout: Option<Duration>,
    ) -> Result<Option<Packet>, LinkError>
    where
        T: Transport + ?Sized,
    {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut polled = false;

        loop {
            if let Some(packet) = self.next_packet() {
                return Ok(Some(packet));
            }

            let wait = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if polled && remaining.is_zero() {
                        self.stats.timeouts += 1;

                        #[cfg(feature = "logging")]
                        debug!("Timeout waiting for packet ({} bytes buffered)", self.buf.len());

                        return Ok(None);
                    }
                    remaining.min(self.config.poll_interval)
                }
                None => self.config.poll_interval,
            };

            transport.read_available(&mut self.buf, wait)?;
            polled = true;
        }
    }

    /// Drop bytes that precede the first START marker
    fn drop_leading_noise(&mut self) {
        let keep_from = find_start(&self.buf).unwrap_or(self.buf.len());
        if keep_from > 0 {
            let noise = self.buf.split_to(keep_from).freeze();
            self.discard(DiscardReason::Noise, noise);
        }
    }

    fn discard(&mut self, reason: DiscardReason, bytes: Bytes) {
        self.stats.bytes_discarded += bytes.len() as u64;
        if let DiscardReason::Invalid(e) = &reason {
            if e.is_corruption() {
                self.stats.checksum_failures += 1;
            } else {
                self.stats.format_failures += 1;
            }
        }

        if let Some(hook) = self.on_discard.as_mut() {
            hook(&DiscardEvent { reason, bytes });
        }
    }
}
