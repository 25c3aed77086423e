//! A port process that owns one sysfs GPIO pin on behalf of a parent.
//!
//! The parent drives the pin with length-prefixed Erlang terms on our stdin
//! and receives replies and interrupt notifications on our stdout.
//!
//! # Crate Structure
//!
//! - [`frame`]: 2-byte length-prefixed framing over byte streams
//! - [`term`]: the subset of the external term format the protocol uses
//! - [`gpio`]: sysfs pin lifecycle and I/O
//! - [`port`]: command dispatch and the event loop

/// Re-export frame types.
pub mod frame {
    pub use gpioport_frame::*;
}

/// Re-export term types.
pub mod term {
    pub use gpioport_term::*;
}

/// Re-export GPIO types.
pub mod gpio {
    pub use gpioport_gpio::*;
}

/// Re-export port types.
pub mod port {
    pub use gpioport_port::*;
}
