//! Value construction macro.
//!
//! [`msgpack!`] builds [`crate::Value`] trees with a JSON-like literal syntax. The macro is
//! fallible and returns `Result<Value, Error>`, because every leaf goes through
//! [`crate::IntoValue`]. Map entries keep the order they are written in.
//!
//! Map key rules:
//! - `{ a: 1 }` uses the text key `"a"` (identifier stringized)
//! - `{ "a": 1 }` or `{ 7: 1 }` uses the literal as key
//! - `{ (k): 1 }` uses the expression `k` as key
//!
//! Array elements and map values are token trees; anything longer than one token, such as a
//! negative number, goes in parentheses.
//!
//! ```
//! # fn demo() -> Result<(), msgpack_codec::Error> {
//! let user_key = "dynamic";
//! let v = msgpack_codec::msgpack!({
//!     a: 1,
//!     (user_key): [true, nil, 1.5, (-3)],
//! })?;
//! assert_eq!(v.get("a"), Some(&msgpack_codec::Value::Int(1)));
//! # Ok(()) }
//! # demo().unwrap();
//! ```

/// Construct a [`crate::Value`] using a JSON-like literal syntax.
///
/// Returns `Result<crate::Value, crate::Error>`.
///
/// Supported forms:
/// - `msgpack!(nil)`
/// - `msgpack!(true)` / `msgpack!(false)`
/// - `msgpack!([ ... ])`
/// - `msgpack!({ key: value, "key": value, (expr_key): value, ... })`
/// - `msgpack!(expr)` where `expr` implements [`crate::IntoValue`]
#[macro_export]
macro_rules! msgpack {
    (nil) => {
        ::core::result::Result::<$crate::Value, $crate::Error>::Ok($crate::Value::Nil)
    };
    (true) => {
        ::core::result::Result::<$crate::Value, $crate::Error>::Ok($crate::Value::Bool(true))
    };
    (false) => {
        ::core::result::Result::<$crate::Value, $crate::Error>::Ok($crate::Value::Bool(false))
    };

    ([ $($elem:tt),* $(,)? ]) => {{
        (|| -> ::core::result::Result<$crate::Value, $crate::Error> {
            let mut items = $crate::__msgpack_macro::Vec::new();
            $crate::__msgpack_macro::try_reserve_exact(
                &mut items,
                0usize $(+ { let _ = stringify!($elem); 1usize })*,
            )?;

            $(
                items.push($crate::msgpack!($elem)?);
            )*

            ::core::result::Result::Ok($crate::Value::Array(items))
        })()
    }};

    ({ $($key:tt : $value:tt),* $(,)? }) => {{
        (|| -> ::core::result::Result<$crate::Value, $crate::Error> {
            let mut entries = $crate::__msgpack_macro::Vec::new();
            $crate::__msgpack_macro::try_reserve_exact(
                &mut entries,
                0usize $(+ { let _ = stringify!($key); let _ = stringify!($value); 1usize })*,
            )?;

            $(
                let k = $crate::__msgpack_key!($key)?;
                let v = $crate::msgpack!($value)?;
                entries.push((k, v));
            )*

            ::core::result::Result::Ok($crate::Value::Map(entries))
        })()
    }};

    ($other:expr) => {{
        $crate::IntoValue::into_value($other)
    }};
}

/// Internal helper for map keys.
#[doc(hidden)]
#[macro_export]
macro_rules! __msgpack_key {
    ($key:ident) => {{
        $crate::IntoValue::into_value(::core::stringify!($key))
    }};
    (($key:expr)) => {{
        $crate::IntoValue::into_value($key)
    }};
    ($key:literal) => {{
        $crate::IntoValue::into_value($key)
    }};
}

/// Hidden support module used by `msgpack!` expansions.
#[doc(hidden)]
#[allow(missing_docs)]
pub mod __msgpack_macro {
    pub use alloc::vec::Vec;

    use crate::Error;

    pub fn try_reserve_exact<T>(v: &mut Vec<T>, additional: usize) -> Result<(), Error> {
        crate::alloc_util::try_reserve_exact(v, additional, 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{ErrorKind, Value};
    use alloc::vec;

    #[test]
    fn nested_literal() {
        let key = 9u8;
        let v = crate::msgpack!({
            name: "x",
            "list": [1, nil, false, (-2), [(b"\xff".as_slice())]],
            (key): {},
        })
        .unwrap();
        assert_eq!(
            v,
            Value::Map(vec![
                (Value::text("name"), Value::text("x")),
                (
                    Value::text("list"),
                    Value::Array(vec![
                        Value::Int(1),
                        Value::Nil,
                        Value::Bool(false),
                        Value::Int(-2),
                        Value::Array(vec![Value::bytes(vec![0xff])]),
                    ])
                ),
                (Value::Int(9), Value::Map(vec![])),
            ])
        );
    }

    #[test]
    fn coercion_failure_propagates() {
        let err = crate::msgpack!([1, (u64::MAX)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Coercion);
    }
}
