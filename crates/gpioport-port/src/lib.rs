//! Command dispatch and event loop for the gpioport process.
//!
//! The parent process writes framed terms to our stdin and reads framed
//! replies from our stdout:
//!
//! | Request                            | Reply                          |
//! |------------------------------------|--------------------------------|
//! | `{init, Pin, input \| output}`     | `ok` or `{error, Reason}`      |
//! | `{cast, release}`                  | none                           |
//! | `{call, Ref, {write, Bit}}`        | `{port_reply, Ref, Result}`    |
//! | `{call, Ref, {read, _}}`           | `{port_reply, Ref, 0 \| 1}`    |
//! | `{call, Ref, {set_int, Edge}}`     | `{port_reply, Ref, Result}`    |
//!
//! While interrupts are armed the port also emits unsolicited
//! `{gpio_interrupt, rising | falling}` frames. These may land between any
//! two replies; the parent tells them apart by shape, never by position.

pub mod command;
pub mod dispatch;
pub mod error;
pub mod notify;
pub mod poll;
pub mod port;
pub mod reply;

pub use command::{Command, Request};
pub use dispatch::dispatch;
pub use error::{PortError, Result};
pub use notify::notify;
pub use poll::{Readiness, WaitSet};
pub use port::Port;

#[cfg(test)]
pub(crate) mod testing;
