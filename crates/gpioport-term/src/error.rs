/// Errors that can occur while decoding or encoding terms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermError {
    /// The payload is empty or does not start with the version byte.
    #[error("invalid version byte (expected 131)")]
    InvalidVersion,

    /// The payload ended in the middle of a term.
    #[error("term truncated at offset {0}")]
    Truncated(usize),

    /// A tag this codec does not handle.
    #[error("unsupported term tag {tag} at offset {offset}")]
    UnsupportedTag { tag: u8, offset: usize },

    /// An atom whose bytes are not valid text.
    #[error("atom at offset {0} is not valid UTF-8")]
    InvalidAtom(usize),

    /// Bytes left over after the top-level term.
    #[error("{0} trailing bytes after term")]
    TrailingBytes(usize),

    /// The value cannot be represented on the wire.
    #[error("cannot encode {0}")]
    Unencodable(String),
}

pub type Result<T> = std::result::Result<T, TermError>;
