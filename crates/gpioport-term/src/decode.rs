use bytes::Bytes;

use crate::error::{Result, TermError};
use crate::term::{Reference, Term};
use crate::{tag, VERSION_MAGIC};

/// Decode one complete term from `payload`.
///
/// The payload must start with the version byte and contain nothing after
/// the term.
pub fn decode(payload: &[u8]) -> Result<Term> {
    if payload.first() != Some(&VERSION_MAGIC) {
        return Err(TermError::InvalidVersion);
    }

    let mut decoder = Decoder {
        src: payload,
        pos: 1,
    };
    let term = decoder.term()?;

    let trailing = payload.len() - decoder.pos;
    if trailing != 0 {
        return Err(TermError::TrailingBytes(trailing));
    }
    Ok(term)
}

struct Decoder<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.src.len() - self.pos < n {
            return Err(TermError::Truncated(self.pos));
        }
        let bytes = &self.src[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn term(&mut self) -> Result<Term> {
        let offset = self.pos;
        match self.u8()? {
            tag::SMALL_INTEGER_EXT => Ok(Term::Integer(i64::from(self.u8()?))),
            tag::INTEGER_EXT => Ok(Term::Integer(i64::from(self.u32()? as i32))),
            tag::ATOM_EXT => {
                let len = self.u16()? as usize;
                Ok(Term::Atom(latin1(self.take(len)?)))
            }
            tag::SMALL_ATOM_EXT => {
                let len = self.u8()? as usize;
                Ok(Term::Atom(latin1(self.take(len)?)))
            }
            tag::ATOM_UTF8_EXT => {
                let len = self.u16()? as usize;
                self.utf8_atom(len, offset)
            }
            tag::SMALL_ATOM_UTF8_EXT => {
                let len = self.u8()? as usize;
                self.utf8_atom(len, offset)
            }
            tag::SMALL_TUPLE_EXT => {
                let arity = self.u8()? as usize;
                self.tuple(arity)
            }
            tag::LARGE_TUPLE_EXT => {
                let arity = self.u32()? as usize;
                self.tuple(arity)
            }
            tag::NIL_EXT => Ok(Term::Nil),
            tag::STRING_EXT => {
                let len = self.u16()? as usize;
                let chars = self.take(len)?;
                Ok(string_list(chars))
            }
            tag::LIST_EXT => {
                let len = self.u32()? as usize;
                self.list(len)
            }
            tag::BINARY_EXT => {
                let len = self.u32()? as usize;
                let data = self.take(len)?;
                Ok(Term::Binary(Bytes::copy_from_slice(data)))
            }
            tag::NEW_REFERENCE_EXT => self.reference(offset, 1),
            tag::NEWER_REFERENCE_EXT => self.reference(offset, 4),
            other => Err(TermError::UnsupportedTag { tag: other, offset }),
        }
    }

    fn utf8_atom(&mut self, len: usize, offset: usize) -> Result<Term> {
        let bytes = self.take(len)?;
        let name = std::str::from_utf8(bytes).map_err(|_| TermError::InvalidAtom(offset))?;
        Ok(Term::Atom(name.to_string()))
    }

    fn tuple(&mut self, arity: usize) -> Result<Term> {
        Ok(Term::Tuple(self.elements(arity)?))
    }

    fn list(&mut self, len: usize) -> Result<Term> {
        let elements = self.elements(len)?;
        let tail = self.term()?;
        if elements.is_empty() {
            return Ok(tail);
        }
        Ok(Term::List {
            elements,
            tail: Box::new(tail),
        })
    }

    fn elements(&mut self, count: usize) -> Result<Vec<Term>> {
        // The declared count is untrusted; cap the allocation by what is left.
        let mut elements = Vec::with_capacity(count.min(self.src.len() - self.pos));
        for _ in 0..count {
            elements.push(self.term()?);
        }
        Ok(elements)
    }

    fn reference(&mut self, offset: usize, creation_len: usize) -> Result<Term> {
        let id_count = self.u16()? as usize;
        let node_offset = self.pos;
        if !matches!(self.term()?, Term::Atom(_)) {
            return Err(TermError::InvalidAtom(node_offset));
        }
        self.take(creation_len)?;
        self.take(id_count * 4)?;

        let encoded = Bytes::copy_from_slice(&self.src[offset..self.pos]);
        Ok(Term::Reference(Reference::from_encoded(encoded)))
    }
}

/// `STRING_EXT` is a byte-list shorthand: `"ab"` is `[97,98]`.
fn string_list(chars: &[u8]) -> Term {
    if chars.is_empty() {
        return Term::Nil;
    }
    Term::List {
        elements: chars.iter().map(|&c| Term::Integer(i64::from(c))).collect(),
        tail: Box::new(Term::Nil),
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
