//! Minimal Erlang external term format codec.
//!
//! Covers the term shapes the gpioport protocol exchanges with its parent:
//! atoms, integers, tuples and opaque references. Lists, strings and
//! binaries are decoded too, since the parent may pass them as arguments
//! the port ignores. Every encoded term starts with the version byte
//! [`VERSION_MAGIC`].

pub mod decode;
pub mod encode;
pub mod error;
pub mod term;

pub use decode::decode;
pub use encode::encode;
pub use error::{Result, TermError};
pub use term::{Reference, Term};

/// External term format version byte.
pub const VERSION_MAGIC: u8 = 131;

pub(crate) mod tag {
    pub const SMALL_INTEGER_EXT: u8 = 97;
    pub const INTEGER_EXT: u8 = 98;
    pub const ATOM_EXT: u8 = 100;
    pub const SMALL_TUPLE_EXT: u8 = 104;
    pub const LARGE_TUPLE_EXT: u8 = 105;
    pub const NIL_EXT: u8 = 106;
    pub const STRING_EXT: u8 = 107;
    pub const LIST_EXT: u8 = 108;
    pub const BINARY_EXT: u8 = 109;
    pub const NEW_REFERENCE_EXT: u8 = 114;
    pub const SMALL_ATOM_EXT: u8 = 115;
    pub const ATOM_UTF8_EXT: u8 = 118;
    pub const SMALL_ATOM_UTF8_EXT: u8 = 119;
    pub const NEWER_REFERENCE_EXT: u8 = 90;
}
