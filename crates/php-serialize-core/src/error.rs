//! Error types for PHP serialize decoding and encoding.
//!
//! Decoding errors carry the byte position of the failure plus an optional
//! preview of the surrounding input to help debug malformed payloads.

use std::fmt;

use thiserror::Error;

/// The error type for decoding PHP serialized data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// The byte position where the error occurred.
    pub position: usize,
    /// Optional context about what was being decoded.
    pub context: Option<String>,
    /// Preview of input around error position for debugging.
    pub input_preview: Option<String>,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.kind, self.position)?;
        if let Some(ref ctx) = self.context {
            write!(f, " ({})", ctx)?;
        }
        if let Some(ref preview) = self.input_preview {
            write!(f, "\n{}", preview)?;
        }
        Ok(())
    }
}

/// Specific kinds of decoding errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A byte was read that does not fit the grammar at this position.
    #[error("expected {expected}, found {}", DisplayByte::of(.found))]
    UnexpectedToken {
        /// What the grammar required.
        expected: Expected,
        /// The byte that was actually read.
        found: u8,
    },

    /// The input ended while more bytes were required.
    #[error("unexpected end of input, expected {expected}")]
    MissingToken {
        /// What the grammar required.
        expected: Expected,
    },

    /// A numeric literal could not be parsed.
    #[error("invalid {kind}: {literal:?}")]
    InvalidNumber {
        /// Which kind of number was being read.
        kind: NumberKind,
        /// The literal as found in the input (lossy UTF-8).
        literal: String,
    },

    /// Nesting depth exceeded.
    #[error("maximum nesting depth ({0}) exceeded")]
    MaxDepthExceeded(usize),
}

/// The token the decoder was looking for when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// A specific delimiter byte.
    Byte(u8),
    /// One of the type tags (`n`, `b`, `i`, `d`, `s`, `a`, `O`).
    TypeTag,
    /// The `0` or `1` of a boolean body.
    BoolDigit,
    /// A string or class-name payload of the given byte length.
    Payload(usize),
    /// The end of the buffer after the top-level value.
    EndOfInput,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Byte(b) => write!(f, "{}", DisplayByte(*b)),
            Expected::TypeTag => f.write_str("type tag"),
            Expected::BoolDigit => f.write_str("'0' or '1'"),
            Expected::Payload(len) => write!(f, "{} payload bytes", len),
            Expected::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// The role of a numeric literal in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    /// An `i:` value.
    Int,
    /// A `d:` value.
    Float,
    /// A string or class-name byte length.
    Length,
    /// An array pair count or object property count.
    Count,
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberKind::Int => f.write_str("integer"),
            NumberKind::Float => f.write_str("float"),
            NumberKind::Length => f.write_str("length"),
            NumberKind::Count => f.write_str("count"),
        }
    }
}

/// Renders a single input byte as a quoted, escaped character.
struct DisplayByte(u8);

impl DisplayByte {
    fn of(byte: &u8) -> Self {
        Self(*byte)
    }
}

impl fmt::Display for DisplayByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", std::ascii::escape_default(self.0))
    }
}

impl DecodeError {
    /// Create a new error with the given kind and position.
    #[inline]
    pub fn new(kind: ErrorKind, position: usize) -> Self {
        Self {
            kind,
            position,
            context: None,
            input_preview: None,
        }
    }

    /// Add context to the error.
    #[inline]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add input preview around the error position for debugging.
    ///
    /// Shows up to 20 bytes before and after the error position. Control
    /// bytes (such as the NUL bytes of mangled property names) are escaped
    /// so that the caret stays aligned.
    #[cold]
    pub fn with_input_preview(mut self, data: &[u8], error_pos: usize) -> Self {
        let start = error_pos.saturating_sub(20).min(data.len());
        let end = error_pos.saturating_add(20).min(data.len());

        let mut line = String::new();
        let mut caret = 0;
        for (i, &byte) in data[start..end].iter().enumerate() {
            if start + i == error_pos {
                caret = line.chars().count();
            }
            if byte.is_ascii_graphic() || byte == b' ' {
                line.push(byte as char);
            } else {
                line.extend(std::ascii::escape_default(byte).map(char::from));
            }
        }
        if error_pos >= end {
            caret = line.chars().count();
        }

        let mut result = String::with_capacity(line.len() + caret + 2);
        result.push_str(&line);
        result.push('\n');
        result.push_str(&" ".repeat(caret));
        result.push('^');

        self.input_preview = Some(result);
        self
    }
}

/// Result type alias for PHP decoding.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// The error type for encoding a value tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// The value cannot be rendered in the serialize grammar.
    #[error("unsupported value: {0}")]
    UnsupportedValue(Unsupported),
}

/// Why a value could not be encoded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Unsupported {
    /// NaN or an infinity; the `d:` body only carries finite decimals.
    #[error("non-finite float {0}")]
    NonFiniteFloat(f64),

    /// The tree nests deeper than the encoder's limit.
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
}
