/// Errors that can occur during frame encoding/decoding.
///
/// Every variant is fatal for the port: there is no way to resynchronize a
/// length-prefixed stream once a frame boundary has been lost.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The length prefix declares a frame larger than the buffer capacity.
    #[error("frame too long ({size} bytes including prefix, max {max})")]
    FrameTooLong { size: usize, max: usize },

    /// The payload handed to the encoder does not fit in one frame.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output stream accepted zero bytes.
    #[error("connection closed (write returned 0)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
