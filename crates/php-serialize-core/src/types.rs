//! PHP value types.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use bstr::BStr;

/// A PHP value as it appears in serialized form.
///
/// Strings, class names and property names are kept as raw bytes: the
/// serialize format counts bytes, not characters, and PHP strings are not
/// required to be valid UTF-8.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PhpValue<'a> {
    /// PHP null value.
    #[default]
    Null,

    /// PHP boolean value.
    Bool(bool),

    /// PHP integer value.
    Int(i64),

    /// PHP float/double value.
    Float(f64),

    /// PHP string value (may contain non-UTF8 bytes).
    /// Borrows from the decoded buffer when possible.
    String(Cow<'a, [u8]>),

    /// PHP array value (ordered map).
    ///
    /// Pairs are kept in wire order and never deduplicated.
    Array(Vec<(PhpValue<'a>, PhpValue<'a>)>),

    /// PHP object value.
    Object {
        /// The class name of the object.
        class_name: Cow<'a, [u8]>,
        /// Object properties in serialization order.
        properties: Vec<PhpProperty<'a>>,
    },
}

/// A PHP object property.
///
/// `name` is always the plain (demangled) key; the visibility prefix lives
/// only on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct PhpProperty<'a> {
    /// Plain property name.
    pub name: Cow<'a, [u8]>,
    /// Property visibility.
    pub visibility: Visibility,
    /// Property value.
    pub value: PhpValue<'a>,
}

/// PHP property visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Public property.
    #[default]
    Public,
    /// Protected property (prefixed with `\0*\0`).
    Protected,
    /// Private property (prefixed with `\0ClassName\0`).
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Protected => f.write_str("protected"),
            Visibility::Private => f.write_str("private"),
        }
    }
}

impl<'a> PhpProperty<'a> {
    /// Create a property with the given visibility.
    pub fn new(
        name: impl Into<Cow<'a, [u8]>>,
        visibility: Visibility,
        value: impl Into<PhpValue<'a>>,
    ) -> Self {
        Self {
            name: name.into(),
            visibility,
            value: value.into(),
        }
    }

    /// Create a public property.
    pub fn public(name: impl Into<Cow<'a, [u8]>>, value: impl Into<PhpValue<'a>>) -> Self {
        Self::new(name, Visibility::Public, value)
    }

    /// Create a protected property.
    pub fn protected(name: impl Into<Cow<'a, [u8]>>, value: impl Into<PhpValue<'a>>) -> Self {
        Self::new(name, Visibility::Protected, value)
    }

    /// Create a private property.
    pub fn private(name: impl Into<Cow<'a, [u8]>>, value: impl Into<PhpValue<'a>>) -> Self {
        Self::new(name, Visibility::Private, value)
    }

    /// Get the property name as UTF-8, if it is valid UTF-8.
    #[inline]
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.name).ok()
    }

    /// Convert to an owned property that doesn't borrow from the input.
    pub fn into_owned(self) -> PhpProperty<'static> {
        PhpProperty {
            name: Cow::Owned(self.name.into_owned()),
            visibility: self.visibility,
            value: self.value.into_owned(),
        }
    }
}

impl<'a> PhpValue<'a> {
    /// Build an object value.
    pub fn object(
        class_name: impl Into<Cow<'a, [u8]>>,
        properties: impl IntoIterator<Item = PhpProperty<'a>>,
    ) -> Self {
        PhpValue::Object {
            class_name: class_name.into(),
            properties: properties.into_iter().collect(),
        }
    }

    /// Build an array value from key/value pairs, preserving their order.
    pub fn array<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<PhpValue<'a>>,
        V: Into<PhpValue<'a>>,
    {
        PhpValue::Array(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a list-style array keyed `0..n`.
    pub fn list<V>(values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<PhpValue<'a>>,
    {
        PhpValue::Array(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (PhpValue::Int(i as i64), v.into()))
                .collect(),
        )
    }

    /// Check if the value is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, PhpValue::Null)
    }

    /// Check if the value is a boolean.
    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, PhpValue::Bool(_))
    }

    /// Check if the value is an integer.
    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, PhpValue::Int(_))
    }

    /// Check if the value is a float.
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, PhpValue::Float(_))
    }

    /// Check if the value is a string.
    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, PhpValue::String(_))
    }

    /// Check if the value is an array.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, PhpValue::Array(_))
    }

    /// Check if the value is an object.
    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, PhpValue::Object { .. })
    }

    /// Get the value as a boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PhpValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as an integer.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PhpValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PhpValue::Float(f) => Some(*f),
            PhpValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the value as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PhpValue::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Get the value as a UTF-8 string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PhpValue::String(s) => std::str::from_utf8(s.as_ref()).ok(),
            _ => None,
        }
    }

    /// Get the value as an array.
    #[inline]
    pub fn as_array(&self) -> Option<&[(PhpValue<'a>, PhpValue<'a>)]> {
        match self {
            PhpValue::Array(a) => Some(a.as_slice()),
            _ => None,
        }
    }

    /// Get the class name of an object.
    #[inline]
    pub fn class_name(&self) -> Option<&[u8]> {
        match self {
            PhpValue::Object { class_name, .. } => Some(class_name.as_ref()),
            _ => None,
        }
    }

    /// Get the properties of an object.
    #[inline]
    pub fn properties(&self) -> Option<&[PhpProperty<'a>]> {
        match self {
            PhpValue::Object { properties, .. } => Some(properties.as_slice()),
            _ => None,
        }
    }

    /// Look up an object property by plain name.
    ///
    /// Returns the first match; the wire format allows the same plain name
    /// under different visibilities.
    pub fn property(&self, name: &str) -> Option<&PhpProperty<'a>> {
        self.properties()?
            .iter()
            .find(|p| p.name.as_ref() == name.as_bytes())
    }

    /// Convert the array to a HashMap if all keys are strings or integers.
    ///
    /// Later duplicates win, as they would in PHP.
    pub fn as_string_map(&self) -> Option<HashMap<String, &PhpValue<'a>>> {
        let arr = self.as_array()?;
        let mut map = HashMap::with_capacity(arr.len());
        for (k, v) in arr {
            let key = match k {
                PhpValue::String(s) => String::from_utf8_lossy(s).into_owned(),
                PhpValue::Int(i) => i.to_string(),
                _ => return None,
            };
            map.insert(key, v);
        }
        Some(map)
    }

    /// Convert to an owned value that doesn't borrow from the input.
    pub fn into_owned(self) -> PhpValue<'static> {
        match self {
            PhpValue::Null => PhpValue::Null,
            PhpValue::Bool(b) => PhpValue::Bool(b),
            PhpValue::Int(i) => PhpValue::Int(i),
            PhpValue::Float(f) => PhpValue::Float(f),
            PhpValue::String(s) => PhpValue::String(Cow::Owned(s.into_owned())),
            PhpValue::Array(arr) => PhpValue::Array(
                arr.into_iter()
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect(),
            ),
            PhpValue::Object {
                class_name,
                properties,
            } => PhpValue::Object {
                class_name: Cow::Owned(class_name.into_owned()),
                properties: properties.into_iter().map(PhpProperty::into_owned).collect(),
            },
        }
    }

    /// Get a type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            PhpValue::Null => "null",
            PhpValue::Bool(_) => "boolean",
            PhpValue::Int(_) => "integer",
            PhpValue::Float(_) => "float",
            PhpValue::String(_) => "string",
            PhpValue::Array(_) => "array",
            PhpValue::Object { .. } => "object",
        }
    }
}

impl From<bool> for PhpValue<'_> {
    fn from(b: bool) -> Self {
        PhpValue::Bool(b)
    }
}

impl From<i64> for PhpValue<'_> {
    fn from(i: i64) -> Self {
        PhpValue::Int(i)
    }
}

impl From<f64> for PhpValue<'_> {
    fn from(f: f64) -> Self {
        PhpValue::Float(f)
    }
}

impl<'a> From<&'a str> for PhpValue<'a> {
    fn from(s: &'a str) -> Self {
        PhpValue::String(Cow::Borrowed(s.as_bytes()))
    }
}

impl From<String> for PhpValue<'_> {
    fn from(s: String) -> Self {
        PhpValue::String(Cow::Owned(s.into_bytes()))
    }
}

impl<'a> From<&'a [u8]> for PhpValue<'a> {
    fn from(b: &'a [u8]) -> Self {
        PhpValue::String(Cow::Borrowed(b))
    }
}

impl From<Vec<u8>> for PhpValue<'_> {
    fn from(b: Vec<u8>) -> Self {
        PhpValue::String(Cow::Owned(b))
    }
}

impl<'a, T: Into<PhpValue<'a>>> From<Option<T>> for PhpValue<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(PhpValue::Null, Into::into)
    }
}

impl fmt::Display for PhpValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhpValue::Null => write!(f, "null"),
            PhpValue::Bool(b) => write!(f, "{}", b),
            PhpValue::Int(i) => write!(f, "{}", i),
            PhpValue::Float(fl) => write!(f, "{}", fl),
            PhpValue::String(s) => write!(f, "\"{}\"", BStr::new(&**s)),
            PhpValue::Array(arr) => {
                write!(f, "[")?;
                for (i, (k, v)) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", k, v)?;
                }
                write!(f, "]")
            }
            PhpValue::Object {
                class_name,
                properties,
            } => {
                write!(f, "{} {{", BStr::new(&**class_name))?;
                for (i, prop) in properties.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(
                        f,
                        " {} {} = {}",
                        prop.visibility,
                        BStr::new(&*prop.name),
                        prop.value
                    )?;
                }
                write!(f, " }}")
            }
        }
    }
}
