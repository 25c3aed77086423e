use std::io::Write;

use gpioport_frame::FrameWriter;
use gpioport_term::Term;
use tracing::trace;

use crate::error::Result;

/// Reply reason: export, direction or value-file setup failed.
pub const GPIO_INIT_FAIL: &str = "gpio_init_fail";
/// Reply reason: write on a pin that is not an output.
pub const GPIO_WRITE_FAILED: &str = "gpio_write_failed";
/// Reply reason: read on a closed pin.
pub const GPIO_READ_FAILED: &str = "gpio_read_failed";
/// Reply reason: interrupt setup on a non-input pin or edge write failure.
pub const GPIO_SET_INT_FAILED: &str = "gpio_set_int_failed";
/// Reply reason: unknown direction, edge mode or out-of-range pin number.
pub const INVALID_ARGUMENT: &str = "invalid_argument";
/// Reply reason: call function this port does not implement.
pub const UNKNOWN_OPERATION: &str = "unknown_operation";

/// `ok`
pub fn ok() -> Term {
    Term::atom("ok")
}

/// `{error, Reason}`
pub fn error(reason: &str) -> Term {
    Term::tuple([Term::atom("error"), Term::atom(reason)])
}

/// `{port_reply, Ref, Result}`
pub fn port_reply(reference: Term, result: Term) -> Term {
    Term::tuple([Term::atom("port_reply"), reference, result])
}

/// `{gpio_interrupt, rising | falling}` for the level read after the edge.
pub fn interrupt(level: bool) -> Term {
    let edge = if level { "rising" } else { "falling" };
    Term::tuple([Term::atom("gpio_interrupt"), Term::atom(edge)])
}

/// Encode `term` and write it as one frame.
pub fn send<W: Write>(writer: &mut FrameWriter<W>, term: &Term) -> Result<()> {
    let payload = gpioport_term::encode(term)?;
    writer.send(&payload)?;
    trace!(%term, bytes = payload.len(), "frame sent");
    Ok(())
}
