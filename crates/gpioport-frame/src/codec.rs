use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: big-endian payload length (2 bytes).
pub const HEADER_SIZE: usize = 2;

/// Fixed capacity of the frame buffer, length prefix included.
pub const BUFFER_CAPACITY: usize = 1024;

/// Largest payload that fits in a single frame.
pub const MAX_PAYLOAD: usize = BUFFER_CAPACITY - HEADER_SIZE;

/// Result of looking for a frame at the front of a buffer.
#[derive(Debug, PartialEq, Eq)]
pub enum Decoded<'a> {
    /// Not enough bytes buffered yet for a complete frame.
    Incomplete,
    /// A complete frame. `consumed` counts the prefix and the payload.
    Message { payload: &'a [u8], consumed: usize },
}

/// Encode a payload into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────────────┐
/// │ Length (2B)  │ Payload          │
/// │ big-endian   │ (Length bytes)   │
/// └──────────────┴──────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u16(payload.len() as u16);
    dst.put_slice(payload);
    Ok(())
}

/// Decode the frame at the front of `src` without consuming it.
///
/// The length check happens as soon as the prefix is available, so an
/// oversized declaration is reported before any of its payload arrives.
pub fn decode_frame(src: &[u8]) -> Result<Decoded<'_>> {
    if src.len() < HEADER_SIZE {
        return Ok(Decoded::Incomplete);
    }

    let payload_len = u16::from_be_bytes([src[0], src[1]]) as usize;
    let total = HEADER_SIZE + payload_len;
    if total > BUFFER_CAPACITY {
        return Err(FrameError::FrameTooLong {
            size: total,
            max: BUFFER_CAPACITY,
        });
    }

    if src.len() < total {
        return Ok(Decoded::Incomplete);
    }

    Ok(Decoded::Message {
        payload: &src[HEADER_SIZE..total],
        consumed: total,
    })
}
