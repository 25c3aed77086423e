use gpioport_term::Term;

use crate::error::{PortError, Result};

/// A decoded request from the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `{init, Pin, Direction}`
    Init { pin: i64, direction: String },
    /// `{cast, release}`
    Release,
    /// `{call, Ref, {Function, Arg}}`
    Call { reference: Term, request: Request },
}

/// The operation inside a `call`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Write(i64),
    Read,
    SetInterrupt(String),
    /// A function name this port does not implement.
    Unknown(String),
}

impl Command {
    /// Classify a decoded term.
    ///
    /// Any shape outside the protocol is a fatal [`PortError::Protocol`]:
    /// the parent never sends one unless the stream is desynchronized.
    pub fn from_term(term: &Term) -> Result<Self> {
        let Some(elements) = term.as_tuple() else {
            return Err(violation("command is not a tuple", term));
        };

        match (leading_atom(elements), elements.len()) {
            (Some("init"), 3) => match (elements[1].as_integer(), elements[2].as_atom()) {
                (Some(pin), Some(direction)) => Ok(Self::Init {
                    pin,
                    direction: direction.to_string(),
                }),
                _ => Err(violation("malformed init", term)),
            },
            (Some("cast"), 2) => match elements[1].as_atom() {
                Some("release") => Ok(Self::Release),
                _ => Err(violation("unknown cast", term)),
            },
            (Some("call"), 3) => Ok(Self::Call {
                reference: elements[1].clone(),
                request: Request::from_term(&elements[2])?,
            }),
            _ => Err(violation("unexpected command", term)),
        }
    }
}

impl Request {
    fn from_term(term: &Term) -> Result<Self> {
        let Some(elements) = term.as_tuple() else {
            return Err(violation("call request is not a tuple", term));
        };
        let Some(function) = leading_atom(elements) else {
            return Err(violation("call request has no function", term));
        };

        match (function, elements.len()) {
            ("write", 2) => elements[1]
                .as_integer()
                .map(Self::Write)
                .ok_or_else(|| violation("malformed write", term)),
            ("read", 1 | 2) => Ok(Self::Read),
            ("set_int", 2) => elements[1]
                .as_atom()
                .map(|mode| Self::SetInterrupt(mode.to_string()))
                .ok_or_else(|| violation("malformed set_int", term)),
            ("write" | "read" | "set_int", _) => Err(violation("wrong arity", term)),
            (other, _) => Ok(Self::Unknown(other.to_string())),
        }
    }
}

fn leading_atom(elements: &[Term]) -> Option<&str> {
    elements.first().and_then(Term::as_atom)
}

fn violation(what: &str, term: &Term) -> PortError {
    PortError::Protocol(format!("{what}: {term}"))
}
