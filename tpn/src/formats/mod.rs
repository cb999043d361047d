//! Input and output file formats.
//!
//! - [`net`]: the textual `.net` format of the Tina toolbox, both read and written.
//! - [`pnml`]: export to PNML Place/Transition nets.

use std::fmt::{self, Display};

use thiserror::Error;

use crate::interval::IntervalError;

pub mod net;
pub mod pnml;
mod scanner;

pub use net::{parse, parse_reader, parse_with, write};

/// A position in the input, both components starting at $1$.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("illegal token {text:?} at {position}")]
    Lexical { text: String, position: Position },
    #[error("{message}; found {found:?} at {position}")]
    Syntax {
        message: &'static str,
        found: String,
        position: Position,
    },
    #[error("bad weight or marking {text:?} at {position}: {source}")]
    Number {
        text: String,
        position: Position,
        #[source]
        source: NumberError,
    },
    #[error("bad time interval {text:?} for transition {transition} at {position}: {source}")]
    Interval {
        text: String,
        transition: String,
        position: Position,
        #[source]
        source: IntervalError,
    },
    #[error("transition {name} is used in a priority before being declared, at {position}")]
    UndeclaredTransition { name: String, position: Position },
    #[error("unable to read net: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// The position of the error in the input, if it has one.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::Lexical { position, .. }
            | ParseError::Syntax { position, .. }
            | ParseError::Number { position, .. }
            | ParseError::Interval { position, .. }
            | ParseError::UndeclaredTransition { position, .. } => Some(*position),
            ParseError::Io(_) => None,
        }
    }
}

/// Options controlling how lenient the parser is.
#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    /// Reject `pr` declarations naming transitions that were not mentioned before.
    ///
    /// By default such transitions are created on the fly.
    pub require_declared_priorities: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NumberError {
    #[error("empty value")]
    Empty,
    #[error("{0:?} is not a number")]
    Invalid(String),
    #[error("{0:?} does not fit in 64 bits")]
    Overflow(String),
}

/// Multiplier suffixes of weights and markings, e.g., `3K` stands for $3000$.
pub(crate) const MULTIPLIERS: [(char, i64); 6] = [
    ('K', 1_000),
    ('M', 1_000_000),
    ('G', 1_000_000_000),
    ('T', 1_000_000_000_000),
    ('P', 1_000_000_000_000_000),
    ('E', 1_000_000_000_000_000_000),
];

/// Converts a weight or a marking, a run of digits optionally followed by one of the
/// multiplier suffixes `K`, `M`, `G`, `T`, `P`, `E`.
pub fn parse_number(text: &str) -> Result<i64, NumberError> {
    if text.is_empty() {
        return Err(NumberError::Empty);
    }
    let (digits, factor) = MULTIPLIERS
        .iter()
        .find_map(|(letter, factor)| text.strip_suffix(*letter).map(|digits| (digits, *factor)))
        .unwrap_or((text, 1));
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(NumberError::Invalid(text.to_owned()));
    }
    digits
        .parse::<i64>()
        .ok()
        .and_then(|value| value.checked_mul(factor))
        .ok_or_else(|| NumberError::Overflow(text.to_owned()))
}
