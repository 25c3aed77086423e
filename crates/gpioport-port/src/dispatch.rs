use gpioport_gpio::{Gpio, GpioError};
use gpioport_term::Term;
use tracing::{debug, warn};

use crate::command::{Command, Request};
use crate::error::{PortError, Result};
use crate::reply;

/// Decode one frame payload, apply it to the pin and build the reply.
///
/// Returns `Ok(None)` for casts, which get no reply. Every `call` yields a
/// `{port_reply, Ref, _}`, even for functions the port does not know.
pub fn dispatch(payload: &[u8], gpio: &mut Gpio) -> Result<Option<Term>> {
    let term = gpioport_term::decode(payload)?;
    let command = Command::from_term(&term)?;
    debug!(%term, "dispatching command");

    match command {
        Command::Init { pin, direction } => init(gpio, pin, &direction).map(Some),
        Command::Release => {
            gpio.release();
            Ok(None)
        }
        Command::Call { reference, request } => {
            let result = call(gpio, request)?;
            Ok(Some(reply::port_reply(reference, result)))
        }
    }
}

fn init(gpio: &mut Gpio, pin: i64, direction: &str) -> Result<Term> {
    let Ok(pin) = u32::try_from(pin) else {
        warn!(pin, "pin number out of range");
        return Ok(reply::error(reply::INVALID_ARGUMENT));
    };

    match gpio.open(pin, direction) {
        Ok(()) => Ok(reply::ok()),
        Err(err) => recover(err, reply::GPIO_INIT_FAIL),
    }
}

fn call(gpio: &mut Gpio, request: Request) -> Result<Term> {
    match request {
        Request::Write(bit) => match gpio.write(bit != 0) {
            Ok(()) => Ok(reply::ok()),
            Err(err) => recover(err, reply::GPIO_WRITE_FAILED),
        },
        Request::Read => match gpio.read() {
            Ok(level) => Ok(Term::Integer(i64::from(level))),
            Err(err) => recover(err, reply::GPIO_READ_FAILED),
        },
        Request::SetInterrupt(mode) => match gpio.set_interrupt(&mode) {
            Ok(()) => Ok(reply::ok()),
            Err(err) => recover(err, reply::GPIO_SET_INT_FAILED),
        },
        Request::Unknown(function) => {
            warn!(%function, "unknown call");
            Ok(reply::error(reply::UNKNOWN_OPERATION))
        }
    }
}

/// Turn a recoverable GPIO error into an `{error, Reason}` term.
fn recover(err: GpioError, reason: &str) -> Result<Term> {
    if err.is_fatal() {
        return Err(PortError::Gpio(err));
    }
    warn!(%err, reason, "gpio request failed");
    match err {
        GpioError::InvalidArgument(_) => Ok(reply::error(reply::INVALID_ARGUMENT)),
        _ => Ok(reply::error(reason)),
    }
}
