//! PHP serialize encoder.
//!
//! The mirror image of the [decoder](crate::decoder): one exhaustive match
//! over [`PhpValue`], emitting exactly the bytes the decoder accepts, so
//! that `decode(&encode(v)?)? == v` for every encodable tree.
//!
//! Two inputs are rejected instead of being silently rewritten: non-finite
//! floats, which have no decimal rendering, and trees nested deeper than the
//! configured limit.

use std::fmt;
use std::io::Write as _;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument, trace, warn};

use crate::decoder::MAX_DEPTH;
use crate::error::{EncodeError, Unsupported};
use crate::mangle::mangle;
use crate::types::{PhpProperty, PhpValue};

/// A PHP serialize encoder writing into an owned buffer.
#[derive(Debug)]
pub struct Encoder {
    out: Vec<u8>,
    depth: usize,
    max_depth: usize,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Create an encoder with an empty buffer.
    pub fn new() -> Self {
        Self::with_buffer(Vec::new())
    }

    /// Create an encoder that appends to `out`.
    pub fn with_buffer(out: Vec<u8>) -> Self {
        Self {
            out,
            depth: 0,
            max_depth: MAX_DEPTH,
        }
    }

    /// Set the maximum nesting depth for arrays and objects.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Bytes written so far.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.out
    }

    /// Consume the encoder and return its buffer.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    /// Append the serialized form of `value`.
    ///
    /// On error the buffer may hold a partial rendering; the free functions
    /// [`encode`] and [`encode_into`] never expose it.
    #[cfg_attr(feature = "tracing", instrument(skip(self, value), level = "trace", fields(value_type = value.type_name(), depth = self.depth)))]
    pub fn encode_value(&mut self, value: &PhpValue<'_>) -> Result<(), EncodeError> {
        match value {
            PhpValue::Null => self.out.push(b'n'),
            PhpValue::Bool(true) => self.out.extend_from_slice(b"b:1;"),
            PhpValue::Bool(false) => self.out.extend_from_slice(b"b:0;"),
            PhpValue::Int(i) => {
                self.out.extend_from_slice(b"i:");
                self.push_display(i);
                self.out.push(b';');
            }
            PhpValue::Float(f) => self.encode_float(*f)?,
            PhpValue::String(s) => self.write_string(s),
            PhpValue::Array(items) => self.encode_array(items)?,
            PhpValue::Object {
                class_name,
                properties,
            } => self.encode_object(class_name, properties)?,
        }
        Ok(())
    }

    fn encode_float(&mut self, f: f64) -> Result<(), EncodeError> {
        if !f.is_finite() {
            #[cfg(feature = "tracing")]
            warn!(value = f, "Refusing to encode non-finite float");
            return Err(EncodeError::UnsupportedValue(Unsupported::NonFiniteFloat(f)));
        }
        // `{}` is the shortest decimal that parses back to the same bits.
        self.out.extend_from_slice(b"d:");
        self.push_display(f);
        self.out.push(b';');
        Ok(())
    }

    fn encode_array(&mut self, items: &[(PhpValue<'_>, PhpValue<'_>)]) -> Result<(), EncodeError> {
        self.out.extend_from_slice(b"a:");
        self.push_display(items.len());
        self.out.extend_from_slice(b":{");

        self.enter()?;
        for (key, value) in items {
            self.encode_value(key)?;
            self.encode_value(value)?;
        }
        self.depth -= 1;

        self.out.push(b'}');
        Ok(())
    }

    fn encode_object(
        &mut self,
        class_name: &[u8],
        properties: &[PhpProperty<'_>],
    ) -> Result<(), EncodeError> {
        self.out.extend_from_slice(b"O:");
        self.push_display(class_name.len());
        self.out.extend_from_slice(b":\"");
        self.out.extend_from_slice(class_name);
        self.out.extend_from_slice(b"\":");
        self.push_display(properties.len());
        self.out.extend_from_slice(b":{");

        self.enter()?;
        for prop in properties {
            #[cfg(feature = "tracing")]
            trace!(visibility = %prop.visibility, name_len = prop.name.len(), "Encoding property");

            self.write_string(&mangle(&prop.name, prop.visibility, class_name));
            self.encode_value(&prop.value)?;
        }
        self.depth -= 1;

        self.out.push(b'}');
        Ok(())
    }

    /// Write a string value: `s:<len>:"<data>";`
    fn write_string(&mut self, s: &[u8]) {
        self.out.extend_from_slice(b"s:");
        self.push_display(s.len());
        self.out.extend_from_slice(b":\"");
        self.out.extend_from_slice(s);
        self.out.extend_from_slice(b"\";");
    }

    #[inline]
    fn enter(&mut self) -> Result<(), EncodeError> {
        if self.depth >= self.max_depth {
            #[cfg(feature = "tracing")]
            warn!(depth = self.depth, max_depth = self.max_depth, "Max depth exceeded");
            return Err(EncodeError::UnsupportedValue(Unsupported::TooDeep(self.max_depth)));
        }
        self.depth += 1;
        Ok(())
    }

    #[inline]
    fn push_display(&mut self, value: impl fmt::Display) {
        // Writing into a Vec<u8> cannot fail.
        let _ = write!(self.out, "{}", value);
    }
}

/// Encode a value tree into PHP serialized bytes.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::{encode, PhpValue};
///
/// let value = PhpValue::list([10_i64, 11, 12]);
/// assert_eq!(encode(&value).unwrap(), b"a:3:{i:0;i:10;i:1;i:11;i:2;i:12;}");
/// ```
pub fn encode(value: &PhpValue<'_>) -> Result<Vec<u8>, EncodeError> {
    #[cfg(feature = "tracing")]
    debug!(value_type = value.type_name(), "Starting PHP encode");

    let mut encoder = Encoder::new();
    let result = encoder.encode_value(value);

    #[cfg(feature = "tracing")]
    match &result {
        Ok(()) => debug!(len = encoder.as_bytes().len(), "Encode completed"),
        Err(e) => warn!(error = %e, "Encode failed"),
    }

    result.map(|()| encoder.into_bytes())
}

/// Append the encoding of `value` to `out`.
///
/// On error `out` is left exactly as it was.
pub fn encode_into(value: &PhpValue<'_>, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let start = out.len();
    let mut encoder = Encoder::with_buffer(std::mem::take(out));
    let result = encoder.encode_value(value);
    *out = encoder.into_bytes();
    if result.is_err() {
        out.truncate(start);
    }
    result
}
