//! Property name mangling.
//!
//! PHP records property visibility by prefixing the serialized key:
//!
//! | Visibility | Serialized key |
//! |------------|----------------|
//! | public | `name` |
//! | protected | `\0*\0name` |
//! | private | `\0ClassName\0name` |
//!
//! A private key is only recognised when the embedded class name is the
//! class of the object being decoded. A private property inherited from a
//! parent class (`\0Parent\0name` inside a `Child`) is reported as public
//! with its raw key intact, so it still encodes back to the same bytes.
//!
//! A public key that itself begins with NUL cannot be told apart from a
//! mangled key; such keys are always read as mangled, as PHP does.

use std::borrow::Cow;

use crate::types::Visibility;

/// The prefix of a protected property key.
pub const PROTECTED_MARKER: &[u8] = b"\0*\0";

/// Split a raw serialized key into its visibility and plain name.
///
/// `class_name` is the class of the object the key belongs to. The
/// protected marker is checked first.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::{mangle::demangle, Visibility};
///
/// assert_eq!(demangle(b"\0*\0id", b"User"), (Visibility::Protected, &b"id"[..]));
/// assert_eq!(demangle(b"\0User\0pw", b"User"), (Visibility::Private, &b"pw"[..]));
/// assert_eq!(demangle(b"name", b"User"), (Visibility::Public, &b"name"[..]));
/// ```
pub fn demangle<'k>(raw: &'k [u8], class_name: &[u8]) -> (Visibility, &'k [u8]) {
    if let Some(plain) = raw.strip_prefix(PROTECTED_MARKER) {
        return (Visibility::Protected, plain);
    }
    if let Some(plain) = strip_private_prefix(raw, class_name) {
        return (Visibility::Private, plain);
    }
    (Visibility::Public, raw)
}

/// Strip `\0ClassName\0` from the front of `raw`.
#[inline]
fn strip_private_prefix<'k>(raw: &'k [u8], class_name: &[u8]) -> Option<&'k [u8]> {
    let rest = raw.strip_prefix(b"\0")?;
    let rest = rest.strip_prefix(class_name)?;
    rest.strip_prefix(b"\0")
}

/// Build the serialized key for a property.
///
/// Public keys are returned unchanged without copying.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::{mangle::mangle, Visibility};
///
/// assert_eq!(&*mangle(b"id", Visibility::Protected, b"User"), b"\0*\0id");
/// assert_eq!(&*mangle(b"pw", Visibility::Private, b"User"), b"\0User\0pw");
/// ```
pub fn mangle<'k>(plain: &'k [u8], visibility: Visibility, class_name: &[u8]) -> Cow<'k, [u8]> {
    match visibility {
        Visibility::Public => Cow::Borrowed(plain),
        Visibility::Protected => {
            let mut raw = Vec::with_capacity(PROTECTED_MARKER.len() + plain.len());
            raw.extend_from_slice(PROTECTED_MARKER);
            raw.extend_from_slice(plain);
            Cow::Owned(raw)
        }
        Visibility::Private => {
            let mut raw = Vec::with_capacity(class_name.len() + plain.len() + 2);
            raw.push(0);
            raw.extend_from_slice(class_name);
            raw.push(0);
            raw.extend_from_slice(plain);
            Cow::Owned(raw)
        }
    }
}
