use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::encode::put_atom;
use crate::tag;

/// A decoded term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Atom(String),
    Integer(i64),
    Tuple(Vec<Term>),
    /// `[]`
    Nil,
    /// A non-empty list. `tail` is `Nil` for proper lists.
    List { elements: Vec<Term>, tail: Box<Term> },
    Binary(Bytes),
    Reference(Reference),
}

impl Term {
    /// Build an atom term.
    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(name.into())
    }

    /// Build a tuple term.
    pub fn tuple(elements: impl Into<Vec<Term>>) -> Self {
        Self::Tuple(elements.into())
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Term]> {
        match self {
            Self::Tuple(elements) => Some(elements),
            _ => None,
        }
    }
}

impl From<Reference> for Term {
    fn from(reference: Reference) -> Self {
        Self::Reference(reference)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(name) => write!(f, "{name}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Tuple(elements) => {
                write!(f, "{{")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "}}")
            }
            Self::Nil => write!(f, "[]"),
            Self::List { elements, tail } => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{element}")?;
                }
                if **tail != Self::Nil {
                    write!(f, "|{tail}")?;
                }
                write!(f, "]")
            }
            Self::Binary(data) => {
                write!(f, "<<")?;
                for (i, byte) in data.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{byte}")?;
                }
                write!(f, ">>")
            }
            Self::Reference(reference) => write!(f, "{reference}"),
        }
    }
}

/// An opaque correlation token.
///
/// Holds the exact bytes the reference was encoded as, tag included, so it
/// is written back to the parent unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    encoded: Bytes,
}

impl Reference {
    /// Build a reference in `NEWER_REFERENCE_EXT` form.
    pub fn new(node: &str, creation: u32, ids: &[u32]) -> Self {
        let mut buf = BytesMut::new();
        buf.put_u8(tag::NEWER_REFERENCE_EXT);
        buf.put_u16(ids.len() as u16);
        put_atom(&mut buf, node);
        buf.put_u32(creation);
        for id in ids {
            buf.put_u32(*id);
        }
        Self {
            encoded: buf.freeze(),
        }
    }

    pub(crate) fn from_encoded(encoded: Bytes) -> Self {
        Self { encoded }
    }

    /// The encoded bytes, starting at the reference tag.
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#Ref<")?;
        for byte in self.encoded.iter() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ">")
    }
}
