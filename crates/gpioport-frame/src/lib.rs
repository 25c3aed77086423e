//! 2-byte length-prefixed message framing for the gpioport stdio protocol.
//!
//! Every message is framed with a big-endian `u16` payload length followed
//! by the payload itself. A whole frame, prefix included, never exceeds
//! [`BUFFER_CAPACITY`] bytes. A frame that declares more is a fatal
//! protocol violation: the stream cannot be resynchronized afterwards.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{decode_frame, encode_frame, Decoded, BUFFER_CAPACITY, HEADER_SIZE, MAX_PAYLOAD};
pub use error::{FrameError, Result};
pub use reader::FrameBuffer;
pub use writer::FrameWriter;
