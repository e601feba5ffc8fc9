//! Byte-stream transports
//!
//! The protocol core never opens or configures a link itself. It talks to a
//! [`Transport`]: something that can hand over the bytes that have arrived so
//! far, write a frame, and be closed.

use bytes::{Bytes, BytesMut};
use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[cfg(feature = "logging")]
use tracing::debug;

/// Size of a single read performed by [`StreamTransport`]'s reader thread
const READ_CHUNK_SIZE: usize = 512;

/// A full-duplex byte link
pub trait Transport {
    /// Append the bytes available right now to `buf`
    ///
    /// Waits at most `wait` for the first byte to arrive and returns the
    /// number of bytes appended; `Ok(0)` means nothing arrived in time.
    /// A source that will never deliver again reports
    /// [`ErrorKind::UnexpectedEof`].
    fn read_available(&mut self, buf: &mut BytesMut, wait: Duration) -> io::Result<usize>;

    /// Write a complete byte sequence, or fail
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Close the link; later reads and writes fail with `NotConnected`
    fn close(&mut self) -> io::Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read_available(&mut self, buf: &mut BytesMut, wait: Duration) -> io::Result<usize> {
        (**self).read_available(buf, wait)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).write_all(data)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

fn not_connected() -> io::Error {
    io::Error::new(ErrorKind::NotConnected, "transport closed")
}

fn end_of_stream() -> io::Error {
    io::Error::new(ErrorKind::UnexpectedEof, "transport reached end of stream")
}

/// Scripted in-memory transport
///
/// Inbound data is queued as chunks and delivered one chunk per read, which
/// makes fragmentation explicit. Everything written is recorded; in loopback
/// mode it is also queued as inbound data, like a TX line wired to RX.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    inbound: VecDeque<Bytes>,
    written: BytesMut,
    loopback: bool,
    finished: bool,
    closed: bool,
}

impl MemoryTransport {
    /// Create an empty transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport whose writes are read back
    pub fn loopback() -> Self {
        Self {
            loopback: true,
            ..Self::default()
        }
    }

    /// Create a transport that delivers the given chunks in order
    pub fn from_chunks<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        let mut transport = Self::new();
        for chunk in chunks {
            transport.push(chunk);
        }
        transport
    }

    /// Queue one inbound chunk
    pub fn push(&mut self, chunk: impl Into<Bytes>) {
        self.inbound.push_back(chunk.into());
    }

    /// Queue `data` split into chunks of at most `chunk_size` bytes
    pub fn push_fragmented(&mut self, data: &[u8], chunk_size: usize) {
        for chunk in data.chunks(chunk_size.max(1)) {
            self.push(Bytes::copy_from_slice(chunk));
        }
    }

    /// Mark the inbound side as exhausted once the queue drains
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Bytes written so far
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Take the bytes written so far
    pub fn take_written(&mut self) -> Bytes {
        self.written.split().freeze()
    }

    /// Number of inbound chunks not yet delivered
    pub fn pending_chunks(&self) -> usize {
        self.inbound.len()
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Transport for MemoryTransport {
    fn read_available(&mut self, buf: &mut BytesMut, wait: Duration) -> io::Result<usize> {
        if self.closed {
            return Err(not_connected());
        }

        match self.inbound.pop_front() {
            Some(chunk) => {
                buf.extend_from_slice(&chunk);
                Ok(chunk.len())
            }
            None if self.finished => Err(end_of_stream()),
            None => {
                // Nothing can arrive while the caller is blocked; honour the wait
                if !wait.is_zero() {
                    thread::sleep(wait);
                }
                Ok(0)
            }
        }
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        if self.closed {
            return Err(not_connected());
        }

        self.written.extend_from_slice(data);
        if self.loopback {
            self.inbound.push_back(Bytes::copy_from_slice(data));
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Transport over any blocking reader and writer
///
/// A background thread performs the blocking reads and forwards chunks over
/// a channel, so `read_available` only ever waits as long as it is told to.
/// Suitable for files, pipes, stdin and device nodes that were configured
/// before being handed over (baud rate, parity and the like are the
/// caller's concern).
///
/// Closing drops the channel but cannot interrupt a read already blocked in
/// the reader thread: the source stays open until that read returns, after
/// which the thread exits. [`reader_finished`](Self::reader_finished)
/// reports when that has happened.
pub struct StreamTransport<W> {
    rx: Option<Receiver<io::Result<Vec<u8>>>>,
    writer: Option<W>,
    reader: JoinHandle<()>,
    eof: bool,
}

impl<W: Write> StreamTransport<W> {
    /// Start reading from `reader` on a background thread
    pub fn spawn<R>(mut reader: R, writer: W) -> io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let reader = thread::Builder::new()
            .name("ezpack-reader".into())
            .spawn(move || {
                let mut chunk = [0u8; READ_CHUNK_SIZE];
                loop {
                    match reader.read(&mut chunk) {
                        Ok(0) => break,
                        Ok(n) => {
                            if tx.send(Ok(chunk[..n].to_vec())).is_err() {
                                break;
                            }
                        }
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(e) => {
                            let _ = tx.send(Err(e));
                            break;
                        }
                    }
                }
            })?;

        Ok(Self {
            rx: Some(rx),
            writer: Some(writer),
            reader,
            eof: false,
        })
    }

    /// Whether the reader thread has exited and released the source
    pub fn reader_finished(&self) -> bool {
        self.reader.is_finished()
    }

    fn accept(chunk: io::Result<Vec<u8>>, buf: &mut BytesMut) -> io::Result<usize> {
        let chunk = chunk?;
        buf.extend_from_slice(&chunk);
        Ok(chunk.len())
    }

    fn mark_eof(eof: &mut bool) -> io::Error {
        if !*eof {
            #[cfg(feature = "logging")]
            debug!("Transport source reached end of stream");
            *eof = true;
        }
        end_of_stream()
    }
}

impl<W: Write> Transport for StreamTransport<W> {
    fn read_available(&mut self, buf: &mut BytesMut, wait: Duration) -> io::Result<usize> {
        let Some(rx) = self.rx.as_ref() else {
            return Err(not_connected());
        };
        if self.eof {
            return Err(end_of_stream());
        }

        let first = if wait.is_zero() {
            match rx.try_recv() {
                Ok(chunk) => Ok(chunk),
                Err(TryRecvError::Empty) => Err(RecvTimeoutError::Timeout),
                Err(TryRecvError::Disconnected) => Err(RecvTimeoutError::Disconnected),
            }
        } else {
            rx.recv_timeout(wait)
        };

        let mut total = match first {
            Ok(chunk) => Self::accept(chunk, buf)?,
            Err(RecvTimeoutError::Timeout) => return Ok(0),
            Err(RecvTimeoutError::Disconnected) => return Err(Self::mark_eof(&mut self.eof)),
        };

        // Drain whatever else has already arrived
        loop {
            match rx.try_recv() {
                Ok(chunk) => total += Self::accept(chunk, buf)?,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Report the data first; EOF surfaces on the next read
                    self.eof = true;
                    break;
                }
            }
        }

        Ok(total)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let writer = self.writer.as_mut().ok_or_else(not_connected)?;
        writer.write_all(data)?;
        writer.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        // The reader thread exits once its next send finds the channel gone
        self.rx = None;
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}
