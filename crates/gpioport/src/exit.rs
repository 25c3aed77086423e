use std::fmt;

use gpioport_frame::FrameError;
use gpioport_port::PortError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const INTERNAL: i32 = 125;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: std::io::Error) -> CliError {
    CliError::new(FAILURE, format!("{context}: {err}"))
}

/// Map a fatal port error to the exit code the parent sees.
///
/// Anything the parent sent that we could not make sense of is
/// `DATA_INVALID`; faults on our side of the pipes are `INTERNAL`.
pub fn port_error(err: PortError) -> CliError {
    let code = match &err {
        PortError::Frame(FrameError::FrameTooLong { .. })
        | PortError::Term(_)
        | PortError::Protocol(_) => DATA_INVALID,
        PortError::Frame(_)
        | PortError::Gpio(_)
        | PortError::Poll(_)
        | PortError::UnexpectedReadiness { .. } => INTERNAL,
    };
    CliError::new(code, err.to_string())
}
