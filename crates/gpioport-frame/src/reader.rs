use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::codec::{decode_frame, Decoded, BUFFER_CAPACITY, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Pending input bytes, bounded by [`BUFFER_CAPACITY`].
///
/// The buffer is filled with one `read` per readiness event and then
/// drained with [`FrameBuffer::next_frame`] until it reports `None`. A single
/// read may carry several frames, or only part of one.
#[derive(Debug)]
pub struct FrameBuffer {
    buf: BytesMut,
}

impl FrameBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(BUFFER_CAPACITY),
        }
    }

    /// Perform one read from `reader` into the free space of the buffer.
    ///
    /// Returns the number of bytes read; `0` means end of stream.
    /// Interrupted reads are retried.
    pub fn fill<R: Read>(&mut self, reader: &mut R) -> Result<usize> {
        let free = BUFFER_CAPACITY - self.buf.len();
        if free == 0 {
            // A drained buffer always has room: a full one would hold a whole frame.
            return Err(FrameError::FrameTooLong {
                size: self.buf.len(),
                max: BUFFER_CAPACITY,
            });
        }

        let mut chunk = [0u8; BUFFER_CAPACITY];
        let read = loop {
            match reader.read(&mut chunk[..free]) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        };

        self.buf.extend_from_slice(&chunk[..read]);
        trace!(read, buffered = self.buf.len(), "filled frame buffer");
        Ok(read)
    }

    /// Append bytes that were read elsewhere.
    pub fn push(&mut self, bytes: &[u8]) -> Result<()> {
        let size = self.buf.len() + bytes.len();
        if size > BUFFER_CAPACITY {
            return Err(FrameError::FrameTooLong {
                size,
                max: BUFFER_CAPACITY,
            });
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Remove and return the payload of the next complete frame.
    ///
    /// Returns `Ok(None)` while the frame at the front is incomplete.
    pub fn next_frame(&mut self) -> Result<Option<Bytes>> {
        let consumed = match decode_frame(&self.buf)? {
            Decoded::Incomplete => return Ok(None),
            Decoded::Message { consumed, .. } => consumed,
        };

        let frame = self.buf.split_to(consumed).freeze();
        Ok(Some(frame.slice(HEADER_SIZE..)))
    }

    /// Number of buffered bytes not yet consumed as frames.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer holds no pending bytes.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
