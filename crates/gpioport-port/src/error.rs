/// Fatal errors: any of these ends the port process.
///
/// Recoverable failures never show up here; the dispatcher turns them into
/// `{error, Reason}` replies.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Framing violation or I/O failure on stdin/stdout.
    #[error("frame error: {0}")]
    Frame(#[from] gpioport_frame::FrameError),

    /// A payload that is not a well-formed term.
    #[error("term error: {0}")]
    Term(#[from] gpioport_term::TermError),

    /// A partial or failed transfer on the open value file.
    #[error("gpio error: {0}")]
    Gpio(#[from] gpioport_gpio::GpioError),

    /// A well-formed term with a shape the protocol does not allow.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The multiplexer wait itself failed.
    #[error("poll failed: {0}")]
    Poll(std::io::Error),

    /// Readiness reported on a descriptor or event we did not account for.
    #[error("unexpected poll readiness: ready={ready}, input=0x{input:04x}, interrupt=0x{interrupt:04x}")]
    UnexpectedReadiness {
        ready: i32,
        input: i16,
        interrupt: i16,
    },
}

pub type Result<T> = std::result::Result<T, PortError>;
