//! Byte-exact encoder and decoder for PHP's `serialize()` format.
//!
//! This crate turns PHP serialized bytes into a [`PhpValue`] tree and back,
//! for tools that have to read or write data produced by PHP runtimes
//! (session stores, caches, queues).
//!
//! # Features
//!
//! - **Zero-copy decoding** - Strings and names borrow from the input buffer
//! - **Byte-exact** - Lengths are byte counts; strings are not required to be UTF-8
//! - **Order preserving** - Arrays and object properties keep wire order
//! - **Visibility aware** - Protected/private property names are demangled
//! - **Detailed errors** - Byte positions, expected tokens and input previews
//!
//! # Quick Start
//!
//! ```rust
//! use php_serialize_core::{decode, encode, PhpValue};
//!
//! let data = br#"a:2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}"#;
//! let value = decode(data).unwrap();
//!
//! if let PhpValue::Array(items) = &value {
//!     for (key, val) in items {
//!         println!("{} => {}", key, val);
//!     }
//! }
//!
//! assert_eq!(encode(&value).unwrap(), data);
//! ```
//!
//! # Property Visibility
//!
//! PHP encodes visibility into the serialized property name. Decoded
//! objects only carry the plain name plus a [`Visibility`]; the encoder
//! rebuilds the prefix:
//!
//! ```rust
//! use php_serialize_core::{decode, encode, PhpProperty, PhpValue};
//!
//! let user = PhpValue::object(
//!     &b"User"[..],
//!     [
//!         PhpProperty::public(&b"name"[..], "Alice"),
//!         PhpProperty::protected(&b"role"[..], "admin"),
//!         PhpProperty::private(&b"hash"[..], "x"),
//!     ],
//! );
//! let bytes = encode(&user).unwrap();
//! assert!(bytes.windows(7).any(|w| w == b"\0*\0role"));
//! assert!(bytes.windows(10).any(|w| w == b"\0User\0hash"));
//! assert_eq!(decode(&bytes).unwrap(), user);
//! ```
//!
//! # Supported Types
//!
//! | PHP Type | Wire | Rust Type |
//! |----------|------|-----------|
//! | `null` | `n` | `PhpValue::Null` |
//! | `bool` | `b:1;` | `PhpValue::Bool(bool)` |
//! | `int` | `i:42;` | `PhpValue::Int(i64)` |
//! | `float` | `d:0.5;` | `PhpValue::Float(f64)` |
//! | `string` | `s:3:"abc";` | `PhpValue::String(Cow<[u8]>)` |
//! | `array` | `a:1:{...}` | `PhpValue::Array(Vec<(PhpValue, PhpValue)>)` |
//! | `object` | `O:4:"User":1:{...}` | `PhpValue::Object { class_name, properties }` |
//!
//! References (`r:`/`R:`), custom-serialized objects (`C:`) and enums
//! (`E:`) are not part of the grammar and fail to decode.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)]

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod mangle;
pub mod types;

pub use decoder::{decode, decode_with_config, Decoder, DecoderConfig};
pub use encoder::{encode, encode_into, Encoder};
pub use error::{DecodeError, EncodeError, ErrorKind, Expected, NumberKind, Result, Unsupported};
pub use types::{PhpProperty, PhpValue, Visibility};
