use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, TermError};
use crate::term::Term;
use crate::{tag, VERSION_MAGIC};

/// Encode a term, version byte first.
pub fn encode(term: &Term) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(64);
    buf.put_u8(VERSION_MAGIC);
    encode_into(&mut buf, term)?;
    Ok(buf.freeze())
}

fn encode_into(buf: &mut BytesMut, term: &Term) -> Result<()> {
    match term {
        Term::Atom(name) => {
            if name.len() > u16::MAX as usize {
                return Err(TermError::Unencodable(format!(
                    "atom of {} bytes",
                    name.len()
                )));
            }
            put_atom(buf, name);
        }
        Term::Integer(value) => match *value {
            0..=255 => {
                buf.put_u8(tag::SMALL_INTEGER_EXT);
                buf.put_u8(*value as u8);
            }
            v if i32::try_from(v).is_ok() => {
                buf.put_u8(tag::INTEGER_EXT);
                buf.put_i32(v as i32);
            }
            v => return Err(TermError::Unencodable(format!("integer {v}"))),
        },
        Term::Tuple(elements) => {
            if let Ok(arity) = u8::try_from(elements.len()) {
                buf.put_u8(tag::SMALL_TUPLE_EXT);
                buf.put_u8(arity);
            } else {
                buf.put_u8(tag::LARGE_TUPLE_EXT);
                buf.put_u32(elements.len() as u32);
            }
            for element in elements {
                encode_into(buf, element)?;
            }
        }
        Term::Nil => buf.put_u8(tag::NIL_EXT),
        Term::List { elements, tail } => {
            buf.put_u8(tag::LIST_EXT);
            buf.put_u32(length(elements.len(), "list")?);
            for element in elements {
                encode_into(buf, element)?;
            }
            encode_into(buf, tail)?;
        }
        Term::Binary(data) => {
            buf.put_u8(tag::BINARY_EXT);
            buf.put_u32(length(data.len(), "binary")?);
            buf.put_slice(data);
        }
        Term::Reference(reference) => buf.put_slice(reference.as_bytes()),
    }
    Ok(())
}

fn length(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| TermError::Unencodable(format!("{what} of length {len}")))
}

/// Write an atom in its UTF-8 form. Callers guarantee `name` fits in a u16 length.
pub(crate) fn put_atom(buf: &mut BytesMut, name: &str) {
    if let Ok(len) = u8::try_from(name.len()) {
        buf.put_u8(tag::SMALL_ATOM_UTF8_EXT);
        buf.put_u8(len);
    } else {
        buf.put_u8(tag::ATOM_UTF8_EXT);
        buf.put_u16(name.len() as u16);
    }
    buf.put_slice(name.as_bytes());
}
