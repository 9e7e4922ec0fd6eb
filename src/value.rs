use alloc::string::String;
use alloc::vec::Vec;

use crate::encode::Encoder;
use crate::profile::CodecProfile;
use crate::Error;

/// The kind of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `Nil`.
    Nil,
    /// `Bool`.
    Bool,
    /// `Int`.
    Int,
    /// `Float`.
    Float,
    /// `Bytes`.
    Bytes,
    /// `Array`.
    Array,
    /// `Map`.
    Map,
}

/// The dynamic value model.
///
/// Text and binary MessagePack strings both decode to [`Value::Bytes`]; on encode the payload is
/// classified as UTF-8 text or binary again. Map entries keep their order.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Nil.
    #[default]
    Nil,
    /// Boolean.
    Bool(bool),
    /// Signed integer. Must fit the configured [`crate::IntWidth`] to be encodable.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Byte string (text or binary).
    Bytes(Vec<u8>),
    /// Ordered sequence.
    Array(Vec<Value>),
    /// Ordered key/value pairs.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Construct `Nil`.
    #[inline]
    #[must_use]
    pub const fn nil() -> Self {
        Self::Nil
    }

    /// Construct a boolean.
    #[inline]
    #[must_use]
    pub const fn bool(v: bool) -> Self {
        Self::Bool(v)
    }

    /// Construct an integer.
    #[inline]
    #[must_use]
    pub const fn int(v: i64) -> Self {
        Self::Int(v)
    }

    /// Construct a float.
    #[inline]
    #[must_use]
    pub const fn float(v: f64) -> Self {
        Self::Float(v)
    }

    /// Construct a byte string.
    #[inline]
    #[must_use]
    pub fn bytes(v: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(v.into())
    }

    /// Construct a byte string from text.
    #[inline]
    #[must_use]
    pub fn text(v: impl Into<String>) -> Self {
        Self::Bytes(v.into().into_bytes())
    }

    /// Construct an array.
    #[inline]
    #[must_use]
    pub const fn array(items: Vec<Self>) -> Self {
        Self::Array(items)
    }

    /// Construct a map from ordered entries.
    #[inline]
    #[must_use]
    pub const fn map(entries: Vec<(Self, Self)>) -> Self {
        Self::Map(entries)
    }

    /// Return the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Nil => ValueKind::Nil,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Array(_) => ValueKind::Array,
            Self::Map(_) => ValueKind::Map,
        }
    }

    /// Returns `true` iff this is `Nil`.
    #[inline]
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Return the boolean if this is `Bool`.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Return the integer if this is `Int`.
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the float if this is `Float`.
    #[inline]
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the byte payload if this is `Bytes`.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Return the payload as `&str` if this is `Bytes` holding valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| crate::utf8::as_utf8(b))
    }

    /// Return the items if this is `Array`.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Return the entries if this is `Map`.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&[(Self, Self)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up the first map entry whose key is the byte string `key`.
    ///
    /// Returns `None` if this is not a map or no such key exists.
    #[must_use]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Self> {
        let key = key.as_ref();
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_bytes() == Some(key))
            .map(|(_, v)| v)
    }

    /// Encode this value with the default profile.
    ///
    /// # Errors
    ///
    /// Returns an error if an integer exceeds the configured width or allocation fails.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, Error> {
        self.to_msgpack_with(CodecProfile::DEFAULT)
    }

    /// Encode this value with an explicit profile.
    ///
    /// # Errors
    ///
    /// Returns an error if an integer exceeds the configured width or allocation fails.
    pub fn to_msgpack_with(&self, profile: CodecProfile) -> Result<Vec<u8>, Error> {
        let mut enc = Encoder::with_profile(profile);
        enc.value(self)?;
        Ok(enc.into_vec())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! from_lossless_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

from_lossless_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Bytes(v.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Bytes(v.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(v)
    }
}

impl From<Vec<(Self, Self)>> for Value {
    fn from(v: Vec<(Self, Self)>) -> Self {
        Self::Map(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Nil, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn accessors_match_variant() {
        assert!(Value::nil().is_nil());
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(-3i8).as_int(), Some(-3));
        assert_eq!(Value::from(1.5f32).as_float(), Some(1.5));
        assert_eq!(Value::text("hi").as_str(), Some("hi"));
        assert_eq!(Value::bytes(vec![0xff]).as_str(), None);
        assert_eq!(Value::from(Some(1u8)), Value::Int(1));
        assert_eq!(Value::from(None::<u8>), Value::Nil);
        assert_eq!(Value::Array(Vec::new()).kind(), ValueKind::Array);
    }

    #[test]
    fn get_finds_first_matching_key() {
        let v = Value::map(vec![
            (Value::text("a"), Value::Int(1)),
            (Value::Int(7), Value::Int(2)),
            (Value::text("a"), Value::Int(3)),
        ]);
        assert_eq!(v.get("a"), Some(&Value::Int(1)));
        assert_eq!(v.get("b"), None);
        assert_eq!(Value::Nil.get("a"), None);
    }
}
