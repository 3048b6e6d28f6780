//! Zero-copy PHP serialize decoder.
//!
//! A recursive-descent reader over a byte cursor. Every body reader consumes
//! exactly its own delimiters, so a failure is reported at the first byte
//! that does not fit the grammar and no partial value escapes.
//!
//! | Tag | Body |
//! |-----|------|
//! | `n` | none (PHP's own `N;` is accepted too) |
//! | `b` | `:0;` or `:1;` |
//! | `i` | `:<int>;` |
//! | `d` | `:<float>;` |
//! | `s` | `:<len>:"<len bytes>";` |
//! | `a` | `:<count>:{<key><value>...}` |
//! | `O` | `:<len>:"<class>":<count>:{<raw key><value>...}` |
//!
//! # Tracing Support
//!
//! Enable the `tracing` feature for decode instrumentation:
//!
//! ```toml
//! php-serialize-core = { version = "0.2", features = ["tracing"] }
//! ```

use std::borrow::Cow;

use memchr::memchr;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument, trace, warn};

use crate::error::{DecodeError, ErrorKind, Expected, NumberKind, Result};
use crate::mangle::demangle;
use crate::types::{PhpProperty, PhpValue};

/// Maximum nesting depth to prevent stack overflow.
///
/// Low enough that an unoptimized build still fits inside a 2 MiB thread
/// stack.
pub const MAX_DEPTH: usize = 128;

/// Decoder configuration options.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Maximum nesting depth for arrays and objects.
    pub max_depth: usize,
    /// Whether bytes after the top-level value are ignored instead of
    /// rejected.
    pub allow_trailing_bytes: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            allow_trailing_bytes: false,
        }
    }
}

/// A zero-copy PHP serialize decoder.
///
/// Strings, class names and property names borrow from the input. A
/// decoder owns its cursor and is meant for one buffer on one thread.
pub struct Decoder<'a> {
    /// Input data.
    data: &'a [u8],
    /// Current position in the input.
    pos: usize,
    /// Decoder configuration.
    config: DecoderConfig,
    /// Current nesting depth.
    depth: usize,
}

impl<'a> Decoder<'a> {
    /// Create a new decoder with default configuration.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, DecoderConfig::default())
    }

    /// Create a new decoder with custom configuration.
    pub fn with_config(data: &'a [u8], config: DecoderConfig) -> Self {
        Self {
            data,
            pos: 0,
            config,
            depth: 0,
        }
    }

    /// Current byte offset into the input.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether the whole input has been consumed.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Decode the buffer as exactly one value.
    ///
    /// Unless `allow_trailing_bytes` is set, anything after the value is an
    /// error.
    #[cfg_attr(feature = "tracing", instrument(skip(self), fields(data_len = self.data.len())))]
    pub fn decode(&mut self) -> Result<PhpValue<'a>> {
        #[cfg(feature = "tracing")]
        debug!(data_len = self.data.len(), "Starting PHP decode");

        let result = self.decode_value().and_then(|value| {
            if !self.config.allow_trailing_bytes {
                if let Some(&found) = self.data.get(self.pos) {
                    return Err(self.error_at(
                        ErrorKind::UnexpectedToken {
                            expected: Expected::EndOfInput,
                            found,
                        },
                        self.pos,
                    ));
                }
            }
            Ok(value)
        });

        #[cfg(feature = "tracing")]
        match &result {
            Ok(value) => debug!(value_type = value.type_name(), consumed = self.pos, "Decode completed"),
            Err(e) => warn!(error = %e, "Decode failed"),
        }

        result
    }

    /// Decode one value at the current position.
    ///
    /// Leaves the cursor just past the value, so it can be called
    /// repeatedly over concatenated payloads.
    #[cfg_attr(feature = "tracing", instrument(skip(self), level = "trace", fields(pos = self.pos, depth = self.depth)))]
    pub fn decode_value(&mut self) -> Result<PhpValue<'a>> {
        let tag_pos = self.pos;
        let tag = self.read_byte(Expected::TypeTag)?;

        #[cfg(feature = "tracing")]
        trace!(type_marker = %char::from(tag), pos = tag_pos, "Decoding value");

        match tag {
            b'n' => Ok(PhpValue::Null),
            b'N' => {
                self.expect_byte(b';')?;
                Ok(PhpValue::Null)
            }
            b'b' => self.decode_bool(),
            b'i' => self.decode_int(),
            b'd' => self.decode_float(),
            b's' => self.decode_string().map(|s| PhpValue::String(Cow::Borrowed(s))),
            b'a' => self.decode_array(tag_pos),
            b'O' => self.decode_object(tag_pos),
            _ => {
                #[cfg(feature = "tracing")]
                warn!(type_byte = %char::from(tag), pos = tag_pos, "Unknown type marker");
                Err(self.error_at(
                    ErrorKind::UnexpectedToken {
                        expected: Expected::TypeTag,
                        found: tag,
                    },
                    tag_pos,
                ))
            }
        }
    }

    /// Decode a boolean body: `:0;` or `:1;`
    fn decode_bool(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b':')?;
        let value = match self.read_byte(Expected::BoolDigit)? {
            b'0' => false,
            b'1' => true,
            found => {
                return Err(self.error_at(
                    ErrorKind::UnexpectedToken {
                        expected: Expected::BoolDigit,
                        found,
                    },
                    self.pos - 1,
                ))
            }
        };
        self.expect_byte(b';')?;
        Ok(PhpValue::Bool(value))
    }

    /// Decode an integer body: `:<value>;`
    fn decode_int(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b':')?;
        let value = self.read_number(b';', NumberKind::Int, parse_int)?;
        Ok(PhpValue::Int(value))
    }

    /// Decode a float body: `:<value>;`
    fn decode_float(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b':')?;
        let value = self.read_number(b';', NumberKind::Float, |s| match s {
            "INF" => Some(f64::INFINITY),
            "-INF" => Some(f64::NEG_INFINITY),
            "NAN" => Some(f64::NAN),
            _ => s.parse::<f64>().ok(),
        })?;
        Ok(PhpValue::Float(value))
    }

    /// Decode a string body: `:<len>:"<data>";`
    fn decode_string(&mut self) -> Result<&'a [u8]> {
        self.expect_byte(b':')?;
        let len = self.read_number(b':', NumberKind::Length, parse_length)?;
        self.expect_byte(b'"')?;
        let bytes = self.take(len)?;
        self.expect_byte(b'"')?;
        self.expect_byte(b';')?;
        Ok(bytes)
    }

    /// Decode an array body: `:<count>:{<key><value>...}`
    fn decode_array(&mut self, start: usize) -> Result<PhpValue<'a>> {
        self.expect_byte(b':')?;
        let count = self.read_number(b':', NumberKind::Count, parse_length)?;
        self.expect_byte(b'{')?;

        self.enter(start)?;
        let mut items = Vec::with_capacity(count.min(1024)); // Cap initial allocation

        for _ in 0..count {
            let key = self.decode_value()?;
            let value = self.decode_value()?;
            items.push((key, value));
        }

        self.depth -= 1;
        self.expect_byte(b'}')?;

        Ok(PhpValue::Array(items))
    }

    /// Decode an object body: `:<namelen>:"<name>":<count>:{<prop>...}`
    fn decode_object(&mut self, start: usize) -> Result<PhpValue<'a>> {
        self.expect_byte(b':')?;
        let name_len = self.read_number(b':', NumberKind::Length, parse_length)?;
        self.expect_byte(b'"')?;
        let class_name = self.take(name_len)?;
        self.expect_byte(b'"')?;
        self.expect_byte(b':')?;
        let count = self.read_number(b':', NumberKind::Count, parse_length)?;
        self.expect_byte(b'{')?;

        self.enter(start)?;
        let mut properties = Vec::with_capacity(count.min(1024));

        for _ in 0..count {
            let raw_name = self.decode_property_name()?;
            let value = self.decode_value()?;
            let (visibility, name) = demangle(raw_name, class_name);

            #[cfg(feature = "tracing")]
            trace!(%visibility, name_len = name.len(), "Decoded property");

            properties.push(PhpProperty {
                name: Cow::Borrowed(name),
                visibility,
                value,
            });
        }

        self.depth -= 1;
        self.expect_byte(b'}')?;

        Ok(PhpValue::Object {
            class_name: Cow::Borrowed(class_name),
            properties,
        })
    }

    /// Decode the raw (still mangled) name of an object property.
    ///
    /// Property names are always serialized as strings.
    fn decode_property_name(&mut self) -> Result<&'a [u8]> {
        let expected = Expected::Byte(b's');
        let found = self.read_byte(expected)?;
        if found != b's' {
            return Err(self
                .error_at(ErrorKind::UnexpectedToken { expected, found }, self.pos - 1)
                .with_context("object property names must be strings"));
        }
        self.decode_string()
    }

    // Helper methods - marked #[inline] for performance on hot paths

    /// Descend into a container, enforcing the depth limit.
    #[inline]
    fn enter(&mut self, start: usize) -> Result<()> {
        if self.depth >= self.config.max_depth {
            #[cfg(feature = "tracing")]
            warn!(depth = self.depth, max_depth = self.config.max_depth, "Max depth exceeded");
            return Err(self.error_at(ErrorKind::MaxDepthExceeded(self.config.max_depth), start));
        }
        self.depth += 1;
        Ok(())
    }

    /// Read and consume the current byte.
    #[inline(always)]
    fn read_byte(&mut self, expected: Expected) -> Result<u8> {
        match self.data.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(byte)
            }
            None => Err(self.missing(expected)),
        }
    }

    /// Expect a specific byte, returning an error if it doesn't match.
    #[inline]
    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        let found = self.read_byte(Expected::Byte(expected))?;
        if found != expected {
            return Err(self.error_at(
                ErrorKind::UnexpectedToken {
                    expected: Expected::Byte(expected),
                    found,
                },
                self.pos - 1,
            ));
        }
        Ok(())
    }

    /// Consume exactly `len` payload bytes.
    #[inline]
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.data.len() - self.pos < len {
            return Err(self.missing(Expected::Payload(len)));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Read bytes until the delimiter, using SIMD-accelerated search.
    ///
    /// The delimiter itself is left unconsumed.
    #[inline]
    fn read_until(&mut self, delimiter: u8) -> Result<&'a [u8]> {
        let start = self.pos;
        match memchr(delimiter, &self.data[start..]) {
            Some(offset) => {
                self.pos = start + offset;
                Ok(&self.data[start..start + offset])
            }
            None => Err(self.missing(Expected::Byte(delimiter))),
        }
    }

    /// Read a numeric literal up to and including its terminator.
    fn read_number<T>(
        &mut self,
        terminator: u8,
        kind: NumberKind,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T> {
        let start = self.pos;
        let literal = self.read_until(terminator)?;
        let value = std::str::from_utf8(literal).ok().and_then(parse);
        match value {
            Some(value) => {
                self.expect_byte(terminator)?;
                Ok(value)
            }
            None => Err(self.error_at(
                ErrorKind::InvalidNumber {
                    kind,
                    literal: String::from_utf8_lossy(literal).into_owned(),
                },
                start,
            )),
        }
    }

    /// Create an end-of-input error with proper context.
    #[cold]
    #[inline(never)]
    fn missing(&self, expected: Expected) -> DecodeError {
        self.error_at(ErrorKind::MissingToken { expected }, self.data.len())
    }

    /// Create an error at `position` with an input preview.
    #[cold]
    #[inline(never)]
    fn error_at(&self, kind: ErrorKind, position: usize) -> DecodeError {
        DecodeError::new(kind, position).with_input_preview(self.data, position)
    }
}

/// Parse a byte length or element count: one or more ASCII digits.
fn parse_length(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse an integer literal: an optional `-` followed by ASCII digits.
fn parse_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Decode PHP serialized data from bytes.
///
/// This is the primary API for decoding. The whole buffer must hold exactly
/// one value.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::decode;
///
/// let value = decode(b"i:42;").unwrap();
/// assert_eq!(value.as_int(), Some(42));
/// ```
#[inline]
pub fn decode(data: &[u8]) -> Result<PhpValue<'_>> {
    #[cfg(feature = "tracing")]
    trace!(data_len = data.len(), "decode called");

    Decoder::new(data).decode()
}

/// Decode PHP serialized data from bytes with custom configuration.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::{decode_with_config, DecoderConfig};
///
/// let config = DecoderConfig {
///     max_depth: 64,
///     allow_trailing_bytes: true,
/// };
/// let value = decode_with_config(b"i:42;\n", config).unwrap();
/// assert_eq!(value.as_int(), Some(42));
/// ```
pub fn decode_with_config(data: &[u8], config: DecoderConfig) -> Result<PhpValue<'_>> {
    #[cfg(feature = "tracing")]
    trace!(data_len = data.len(), ?config, "decode_with_config called");

    Decoder::with_config(data, config).decode()
}

#[cfg(test)]
#[allow(clippy::approx_constant)]
mod tests {
    use super::*;
    use crate::types::Visibility;

    fn kind_of(data: &[u8]) -> (ErrorKind, usize) {
        let err = decode(data).unwrap_err();
        (err.kind, err.position)
    }

    #[test]
    fn test_null() {
        assert_eq!(decode(b"n").unwrap(), PhpValue::Null);
        assert_eq!(decode(b"N;").unwrap(), PhpValue::Null);
    }

    #[test]
    fn test_bool() {
        assert_eq!(decode(b"b:0;").unwrap(), PhpValue::Bool(false));
        assert_eq!(decode(b"b:1;").unwrap(), PhpValue::Bool(true));
    }

    #[test]
    fn test_int() {
        assert_eq!(decode(b"i:500;").unwrap(), PhpValue::Int(500));
        assert_eq!(decode(b"i:0;").unwrap(), PhpValue::Int(0));
        assert_eq!(decode(b"i:-123;").unwrap(), PhpValue::Int(-123));
        assert_eq!(
            decode(b"i:9223372036854775807;").unwrap(),
            PhpValue::Int(i64::MAX)
        );
        assert_eq!(
            decode(b"i:-9223372036854775808;").unwrap(),
            PhpValue::Int(i64::MIN)
        );
    }

    #[test]
    fn test_float() {
        assert_eq!(decode(b"d:0;").unwrap(), PhpValue::Float(0.0));
        assert_eq!(decode(b"d:3.14;").unwrap(), PhpValue::Float(3.14));
        assert_eq!(decode(b"d:-2.5;").unwrap(), PhpValue::Float(-2.5));
        assert_eq!(decode(b"d:1.0E+25;").unwrap(), PhpValue::Float(1.0e25));
    }

    #[test]
    fn test_float_special_values() {
        assert!(matches!(decode(b"d:INF;").unwrap(), PhpValue::Float(f) if f.is_infinite() && f.is_sign_positive()));
        assert!(matches!(decode(b"d:-INF;").unwrap(), PhpValue::Float(f) if f.is_infinite() && f.is_sign_negative()));
        assert!(matches!(decode(b"d:NAN;").unwrap(), PhpValue::Float(f) if f.is_nan()));
    }

    #[test]
    fn test_string() {
        assert_eq!(decode(b"s:4:\"test\";").unwrap(), PhpValue::from("test"));
        assert_eq!(decode(b"s:0:\"\";").unwrap(), PhpValue::from(""));
    }

    #[test]
    fn test_string_is_borrowed() {
        let data = b"s:5:\"hello\";";
        assert!(matches!(decode(data).unwrap(), PhpValue::String(Cow::Borrowed(b"hello"))));
    }

    #[test]
    fn test_string_multibyte() {
        // "한글" = 6 bytes in UTF-8
        let korean = b"s:6:\"\xed\x95\x9c\xea\xb8\x80\";";
        assert_eq!(decode(korean).unwrap().as_str(), Some("한글"));
    }

    #[test]
    fn test_string_length_counts_bytes() {
        // Declared as 2 characters instead of 6 bytes.
        let data = b"s:2:\"\xed\x95\x9c\xea\xb8\x80\";";
        assert_eq!(
            kind_of(data),
            (
                ErrorKind::UnexpectedToken {
                    expected: Expected::Byte(b'"'),
                    found: 0x9c
                },
                7
            )
        );
    }

    #[test]
    fn test_string_binary() {
        let data = b"s:5:\"a\x00b\xffc\";";
        assert_eq!(decode(data).unwrap().as_bytes(), Some(&b"a\x00b\xffc"[..]));
    }

    #[test]
    fn test_string_with_delimiters() {
        assert_eq!(decode(b"s:11:\"hello;world\";").unwrap().as_str(), Some("hello;world"));
        assert_eq!(decode(b"s:8:\"say \"hi\"\";").unwrap().as_str(), Some("say \"hi\""));
    }

    #[test]
    fn test_array() {
        assert_eq!(
            decode(b"a:3:{i:0;i:10;i:1;i:11;i:2;i:12;}").unwrap(),
            PhpValue::Array(vec![
                (PhpValue::Int(0), PhpValue::Int(10)),
                (PhpValue::Int(1), PhpValue::Int(11)),
                (PhpValue::Int(2), PhpValue::Int(12)),
            ])
        );
    }

    #[test]
    fn test_array_empty() {
        assert_eq!(decode(b"a:0:{}").unwrap(), PhpValue::Array(vec![]));
    }

    #[test]
    fn test_array_associative_keeps_order() {
        let value = decode(b"a:2:{s:3:\"foo\";i:4;s:3:\"bar\";i:2;}").unwrap();
        assert_eq!(value, PhpValue::array([("foo", 4_i64), ("bar", 2)]));
    }

    #[test]
    fn test_array_duplicate_keys_kept() {
        let value = decode(b"a:2:{i:0;s:1:\"a\";i:0;s:1:\"b\";}").unwrap();
        assert_eq!(value, PhpValue::array([(0_i64, "a"), (0, "b")]));
    }

    #[test]
    fn test_array_with_null_and_nested() {
        let value = decode(b"a:2:{i:0;ns:1:\"k\";a:1:{b:1;d:0.5;}}").unwrap();
        assert_eq!(
            value,
            PhpValue::Array(vec![
                (PhpValue::Int(0), PhpValue::Null),
                (
                    PhpValue::from("k"),
                    PhpValue::array([(true, 0.5_f64)])
                ),
            ])
        );
    }

    #[test]
    fn test_object_public() {
        let value = decode(b"O:4:\"Test\":1:{s:6:\"public\";i:1;}").unwrap();
        assert_eq!(
            value,
            PhpValue::object(&b"Test"[..], [PhpProperty::public(&b"public"[..], 1_i64)])
        );
    }

    #[test]
    fn test_object_private_protected() {
        // Private: \0Test\0priv = 10 bytes, protected: \0*\0prot = 7 bytes
        let data = b"O:4:\"Test\":3:{s:3:\"pub\";s:6:\"public\";s:10:\"\x00Test\x00priv\";s:7:\"private\";s:7:\"\x00*\x00prot\";s:9:\"protected\";}";
        let value = decode(data).unwrap();
        assert_eq!(
            value,
            PhpValue::object(
                &b"Test"[..],
                [
                    PhpProperty::public(&b"pub"[..], "public"),
                    PhpProperty::private(&b"priv"[..], "private"),
                    PhpProperty::protected(&b"prot"[..], "protected"),
                ]
            )
        );
    }

    #[test]
    fn test_object_names_are_borrowed() {
        let data = b"O:4:\"Test\":1:{s:10:\"\x00Test\x00priv\";i:1;}";
        let value = decode(data).unwrap();
        let PhpValue::Object { class_name, properties } = &value else {
            panic!("expected object, got {:?}", value);
        };
        assert!(matches!(*class_name, Cow::Borrowed(b"Test")));
        assert!(matches!(properties[0].name, Cow::Borrowed(b"priv")));
    }

    #[test]
    fn test_object_parent_private_stays_raw() {
        let data = b"O:5:\"Child\":1:{s:14:\"\x00Parent\x00secret\";i:1;}";
        let props = decode(data).unwrap().properties().unwrap().to_vec();
        assert_eq!(props[0].visibility, Visibility::Public);
        assert_eq!(&*props[0].name, b"\x00Parent\x00secret");
    }

    #[test]
    fn test_object_nested() {
        let data = b"O:8:\"stdClass\":1:{s:5:\"inner\";O:3:\"Foo\":0:{}}";
        let value = decode(data).unwrap();
        let inner = &value.property("inner").unwrap().value;
        assert_eq!(inner.class_name(), Some(&b"Foo"[..]));
        assert_eq!(inner.properties().map(<[_]>::len), Some(0));
    }

    #[test]
    fn test_decoder_consecutive_values() {
        let mut decoder = Decoder::new(b"i:1;b:0;");
        assert_eq!(decoder.decode_value().unwrap(), PhpValue::Int(1));
        assert_eq!(decoder.position(), 4);
        assert_eq!(decoder.decode_value().unwrap(), PhpValue::Bool(false));
        assert!(decoder.is_at_end());
    }

    #[test]
    fn test_nested_array_depth() {
        let mut data = String::from("s:4:\"leaf\";");
        for _ in 0..100 {
            data = format!("a:1:{{s:1:\"k\";{}}}", data);
        }
        assert!(decode(data.as_bytes()).unwrap().is_array());
    }

    #[test]
    fn test_max_depth_exceeded() {
        let config = DecoderConfig {
            max_depth: 2,
            ..Default::default()
        };
        assert!(decode_with_config(b"a:1:{i:0;a:0:{}}", config.clone()).is_ok());
        let err = decode_with_config(b"a:1:{i:0;a:1:{i:0;a:0:{}}}", config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MaxDepthExceeded(2));
        assert_eq!(err.position, 18);
    }

    fn nested_lists(depth: usize) -> String {
        format!("{}n{}", "a:1:{i:0;".repeat(depth), "}".repeat(depth))
    }

    /// Decode on a thread with the default 2 MiB stack, whatever the test
    /// harness was given.
    fn decode_on_small_stack(data: String) -> std::result::Result<(), ErrorKind> {
        std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || decode(data.as_bytes()).map(|_| ()).map_err(|e| e.kind))
            .unwrap()
            .join()
            .unwrap()
    }

    #[test]
    fn test_default_depth_limit() {
        assert_eq!(decode_on_small_stack(nested_lists(MAX_DEPTH)), Ok(()));
        assert_eq!(
            decode_on_small_stack(nested_lists(MAX_DEPTH + 1)),
            Err(ErrorKind::MaxDepthExceeded(MAX_DEPTH))
        );
    }

    #[test]
    fn test_hostile_nesting_is_an_error() {
        assert_eq!(
            decode_on_small_stack(nested_lists(10_000)),
            Err(ErrorKind::MaxDepthExceeded(MAX_DEPTH))
        );
    }

    #[test]
    fn test_error_unknown_tag() {
        assert_eq!(
            kind_of(b"X:1;"),
            (
                ErrorKind::UnexpectedToken {
                    expected: Expected::TypeTag,
                    found: b'X'
                },
                0
            )
        );
    }

    #[test]
    fn test_error_empty_input() {
        assert_eq!(
            kind_of(b""),
            (
                ErrorKind::MissingToken {
                    expected: Expected::TypeTag
                },
                0
            )
        );
    }

    #[test]
    fn test_error_invalid_bool() {
        assert_eq!(
            kind_of(b"b:2;"),
            (
                ErrorKind::UnexpectedToken {
                    expected: Expected::BoolDigit,
                    found: b'2'
                },
                2
            )
        );
    }

    #[test]
    fn test_error_invalid_int() {
        assert_eq!(
            kind_of(b"i:abc;"),
            (
                ErrorKind::InvalidNumber {
                    kind: NumberKind::Int,
                    literal: "abc".into()
                },
                2
            )
        );
        assert!(matches!(
            kind_of(b"i:99999999999999999999;").0,
            ErrorKind::InvalidNumber { kind: NumberKind::Int, .. }
        ));
        assert!(matches!(
            kind_of(b"i:;").0,
            ErrorKind::InvalidNumber { kind: NumberKind::Int, .. }
        ));
    }

    #[test]
    fn test_error_int_plus_sign() {
        assert_eq!(
            kind_of(b"i:+5;"),
            (
                ErrorKind::InvalidNumber {
                    kind: NumberKind::Int,
                    literal: "+5".into()
                },
                2
            )
        );
        assert!(matches!(
            kind_of(b"i:-;").0,
            ErrorKind::InvalidNumber { kind: NumberKind::Int, .. }
        ));
        assert!(matches!(
            kind_of(b"i: 5;").0,
            ErrorKind::InvalidNumber { kind: NumberKind::Int, .. }
        ));
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("0"), Some(0));
        assert_eq!(parse_int("-42"), Some(-42));
        assert_eq!(parse_int("+42"), None);
        assert_eq!(parse_int("--1"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn test_error_invalid_float() {
        assert!(matches!(
            kind_of(b"d:1.2.3;").0,
            ErrorKind::InvalidNumber { kind: NumberKind::Float, .. }
        ));
    }

    #[test]
    fn test_error_negative_length() {
        assert_eq!(
            kind_of(b"s:-1:\"\";"),
            (
                ErrorKind::InvalidNumber {
                    kind: NumberKind::Length,
                    literal: "-1".into()
                },
                2
            )
        );
        assert!(matches!(
            kind_of(b"a:x:{}").0,
            ErrorKind::InvalidNumber { kind: NumberKind::Count, .. }
        ));
    }

    #[test]
    fn test_error_truncated_string() {
        assert_eq!(
            kind_of(b"s:10:\"hello"),
            (
                ErrorKind::MissingToken {
                    expected: Expected::Payload(10)
                },
                11
            )
        );
        assert_eq!(
            kind_of(b"s:4:\"test\""),
            (
                ErrorKind::MissingToken {
                    expected: Expected::Byte(b';')
                },
                10
            )
        );
    }

    #[test]
    fn test_error_short_string() {
        assert_eq!(
            kind_of(b"s:3:\"test\";"),
            (
                ErrorKind::UnexpectedToken {
                    expected: Expected::Byte(b'"'),
                    found: b't'
                },
                8
            )
        );
    }

    #[test]
    fn test_error_truncated_null() {
        assert_eq!(
            kind_of(b"N"),
            (
                ErrorKind::MissingToken {
                    expected: Expected::Byte(b';')
                },
                1
            )
        );
    }

    #[test]
    fn test_error_too_few_pairs() {
        assert_eq!(
            kind_of(b"a:2:{i:0;i:1;}"),
            (
                ErrorKind::UnexpectedToken {
                    expected: Expected::TypeTag,
                    found: b'}'
                },
                13
            )
        );
    }

    #[test]
    fn test_error_too_many_pairs() {
        assert_eq!(
            kind_of(b"a:1:{i:0;i:1;i:2;i:3;}"),
            (
                ErrorKind::UnexpectedToken {
                    expected: Expected::Byte(b'}'),
                    found: b'i'
                },
                13
            )
        );
    }

    #[test]
    fn test_error_truncated_array() {
        assert!(matches!(
            kind_of(b"a:1:{i:0;").0,
            ErrorKind::MissingToken { expected: Expected::TypeTag }
        ));
    }

    #[test]
    fn test_error_non_string_property_name() {
        let err = decode(b"O:1:\"A\":1:{i:0;i:1;}").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedToken {
                expected: Expected::Byte(b's'),
                found: b'i'
            }
        );
        assert_eq!(err.position, 11);
        assert!(err.context.is_some());
    }

    #[test]
    fn test_error_truncated_class_name() {
        assert_eq!(
            kind_of(b"O:20:\"Test\":0:{}"),
            (
                ErrorKind::MissingToken {
                    expected: Expected::Payload(20)
                },
                16
            )
        );
    }

    #[test]
    fn test_error_has_preview() {
        let err = decode(b"i:1x").unwrap_err();
        assert!(err.input_preview.is_some());
    }

    #[test]
    fn test_trailing_bytes() {
        assert_eq!(
            kind_of(b"b:1;x"),
            (
                ErrorKind::UnexpectedToken {
                    expected: Expected::EndOfInput,
                    found: b'x'
                },
                4
            )
        );
        let config = DecoderConfig {
            allow_trailing_bytes: true,
            ..Default::default()
        };
        assert_eq!(decode_with_config(b"b:1;x", config).unwrap(), PhpValue::Bool(true));
    }

    #[test]
    fn test_quoted_payload_is_not_repaired() {
        let escaped = b"\"a:1:{s:3:\"\"key\"\";i:1;}\"";
        assert_eq!(
            kind_of(escaped),
            (
                ErrorKind::UnexpectedToken {
                    expected: Expected::TypeTag,
                    found: b'"'
                },
                0
            )
        );
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("0"), Some(0));
        assert_eq!(parse_length("42"), Some(42));
        assert_eq!(parse_length(""), None);
        assert_eq!(parse_length("+1"), None);
        assert_eq!(parse_length("-1"), None);
        assert_eq!(parse_length("99999999999999999999999"), None);
    }
}
