//! Single-pin GPIO resource manager over the Linux sysfs interface.
//!
//! A [`Gpio`] owns the one pin slot of the process. It exports and
//! configures a pin through the sysfs control files, keeps the pin's
//! `value` file open for fast access, and tracks the pin state machine:
//!
//! ```text
//! Closed ──open(output)──▶ Output
//! Closed ──open(input)───▶ Input ──set_interrupt──▶ InputWithInterrupts
//! any    ──release───────▶ Closed
//! ```

pub mod error;
pub mod pin;
pub mod sysfs;

pub use error::{GpioError, Result};
pub use pin::{Direction, Edge, Gpio, PinState};
pub use sysfs::{Sysfs, DEFAULT_SYSFS_ROOT};

#[cfg(test)]
pub(crate) mod testing;
