use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::alloc_util::{try_push, try_vec_with_capacity};
use crate::value::Value;
use crate::{Error, ErrorCode};

/// A map represented as ordered key/value entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntries<K, V>(pub Vec<(K, V)>);

impl<K, V> MapEntries<K, V> {
    /// Wrap an existing vector of entries.
    #[must_use]
    pub const fn new(entries: Vec<(K, V)>) -> Self {
        Self(entries)
    }
}

/// Explicit conversion of a host value into the [`Value`] model.
///
/// This is the only route by which arbitrary Rust data reaches the encoder. A failed conversion
/// is reported as the implementation's own [`Error`] and is passed through unchanged by
/// [`crate::pack_any`].
pub trait IntoValue {
    /// Convert `self` into a [`Value`].
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ErrorKind::Coercion`] error if `self` has no representation.
    fn into_value(self) -> Result<Value, Error>;
}

/// Marker trait for values that become array elements when collected in a `Vec`.
///
/// Not implemented for `u8`: `Vec<u8>` is a byte string.
pub trait ArrayElem {}

fn not_representable() -> Error {
    Error::coercion(ErrorCode::NotRepresentable)
}

impl IntoValue for Value {
    fn into_value(self) -> Result<Value, Error> {
        Ok(self)
    }
}

impl IntoValue for () {
    fn into_value(self) -> Result<Value, Error> {
        Ok(Value::Nil)
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Result<Value, Error> {
        Ok(Value::Bool(self))
    }
}

macro_rules! into_value_lossless_int {
    ($($t:ty),*) => {
        $(
            impl IntoValue for $t {
                fn into_value(self) -> Result<Value, Error> {
                    Ok(Value::Int(i64::from(self)))
                }
            }
        )*
    };
}

into_value_lossless_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! into_value_checked_int {
    ($($t:ty),*) => {
        $(
            impl IntoValue for $t {
                fn into_value(self) -> Result<Value, Error> {
                    i64::try_from(self)
                        .map(Value::Int)
                        .map_err(|_| not_representable())
                }
            }
        )*
    };
}

into_value_checked_int!(u64, u128, i128, usize, isize);

impl IntoValue for f32 {
    fn into_value(self) -> Result<Value, Error> {
        Ok(Value::Float(f64::from(self)))
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Result<Value, Error> {
        Ok(Value::Float(self))
    }
}

impl IntoValue for char {
    fn into_value(self) -> Result<Value, Error> {
        let mut buf = [0u8; 4];
        Ok(Value::Bytes(self.encode_utf8(&mut buf).as_bytes().to_vec()))
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Result<Value, Error> {
        Ok(Value::Bytes(self.as_bytes().to_vec()))
    }
}

impl IntoValue for String {
    fn into_value(self) -> Result<Value, Error> {
        Ok(Value::Bytes(self.into_bytes()))
    }
}

impl IntoValue for &String {
    fn into_value(self) -> Result<Value, Error> {
        self.as_str().into_value()
    }
}

impl IntoValue for &[u8] {
    fn into_value(self) -> Result<Value, Error> {
        Ok(Value::Bytes(self.to_vec()))
    }
}

impl IntoValue for Vec<u8> {
    fn into_value(self) -> Result<Value, Error> {
        Ok(Value::Bytes(self))
    }
}

#[cfg(feature = "std")]
impl IntoValue for &std::ffi::OsStr {
    fn into_value(self) -> Result<Value, Error> {
        self.to_str()
            .ok_or_else(|| Error::coercion(ErrorCode::InvalidText))?
            .into_value()
    }
}

#[cfg(feature = "std")]
impl IntoValue for &std::path::Path {
    fn into_value(self) -> Result<Value, Error> {
        self.as_os_str().into_value()
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Result<Value, Error> {
        match self {
            Some(v) => v.into_value(),
            None => Ok(Value::Nil),
        }
    }
}

impl<T: IntoValue + ArrayElem> IntoValue for Vec<T> {
    fn into_value(self) -> Result<Value, Error> {
        let mut items = try_vec_with_capacity(self.len(), 0)?;
        for item in self {
            try_push(&mut items, item.into_value()?, 0)?;
        }
        Ok(Value::Array(items))
    }
}

fn collect_entries<K, V, I>(len: usize, entries: I) -> Result<Value, Error>
where
    K: IntoValue,
    V: IntoValue,
    I: IntoIterator<Item = (K, V)>,
{
    let mut out = try_vec_with_capacity(len, 0)?;
    for (k, v) in entries {
        try_push(&mut out, (k.into_value()?, v.into_value()?), 0)?;
    }
    Ok(Value::Map(out))
}

impl<K: IntoValue, V: IntoValue> IntoValue for MapEntries<K, V> {
    fn into_value(self) -> Result<Value, Error> {
        let len = self.0.len();
        collect_entries(len, self.0)
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for BTreeMap<K, V> {
    fn into_value(self) -> Result<Value, Error> {
        let len = self.len();
        collect_entries(len, self)
    }
}

#[cfg(feature = "std")]
impl<K: IntoValue, V: IntoValue, S> IntoValue for std::collections::HashMap<K, V, S> {
    fn into_value(self) -> Result<Value, Error> {
        let len = self.len();
        collect_entries(len, self)
    }
}

macro_rules! into_value_tuple {
    ($($name:ident),+) => {
        impl<$($name: IntoValue),+> IntoValue for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_value(self) -> Result<Value, Error> {
                let ($($name,)+) = self;
                Ok(Value::Array(alloc::vec![$($name.into_value()?),+]))
            }
        }

        impl<$($name: IntoValue),+> ArrayElem for ($($name,)+) {}
    };
}

into_value_tuple!(A);
into_value_tuple!(A, B);
into_value_tuple!(A, B, C);
into_value_tuple!(A, B, C, D);

macro_rules! array_elem {
    ($($t:ty),*) => {
        $(impl ArrayElem for $t {})*
    };
}

array_elem!(
    Value, (), bool, i8, i16, i32, i64, u16, u32, u64, u128, i128, usize, isize, f32, f64, char,
    String, &str, &[u8]
);

impl<T: ArrayElem> ArrayElem for Option<T> {}
impl<T: ArrayElem> ArrayElem for Vec<T> {}
impl ArrayElem for Vec<u8> {}
impl<K, V> ArrayElem for MapEntries<K, V> {}
impl<K, V> ArrayElem for BTreeMap<K, V> {}
#[cfg(feature = "std")]
impl<K, V, S> ArrayElem for std::collections::HashMap<K, V, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use alloc::vec;

    #[test]
    fn wide_integers_fail_as_coercion() {
        assert_eq!(u64::MAX.into_value().unwrap_err().kind(), ErrorKind::Coercion);
        assert_eq!(i128::MIN.into_value().unwrap_err().kind(), ErrorKind::Coercion);
        assert_eq!(
            (i64::MAX as u64).into_value().unwrap(),
            Value::Int(i64::MAX)
        );
    }

    #[test]
    fn byte_vectors_stay_strings() {
        assert_eq!(vec![1u8, 2].into_value().unwrap(), Value::bytes(vec![1, 2]));
        assert_eq!(
            vec![vec![1u8]].into_value().unwrap(),
            Value::Array(vec![Value::bytes(vec![1])])
        );
        assert_eq!(
            vec![1u16, 2].into_value().unwrap(),
            Value::Array(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn tuples_and_maps() {
        let v = (1i32, "a", None::<bool>).into_value().unwrap();
        assert_eq!(
            v,
            Value::Array(vec![Value::Int(1), Value::text("a"), Value::Nil])
        );

        let mut m = BTreeMap::new();
        m.insert("b", 2u8);
        m.insert("a", 1u8);
        assert_eq!(
            m.into_value().unwrap(),
            Value::Map(vec![
                (Value::text("a"), Value::Int(1)),
                (Value::text("b"), Value::Int(2)),
            ])
        );
    }

    #[test]
    fn char_is_text() {
        assert_eq!('é'.into_value().unwrap().as_str(), Some("é"));
    }
}
