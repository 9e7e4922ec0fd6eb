use alloc::vec::Vec;

use crate::alloc_util::{try_push, try_vec_from_slice, try_vec_with_capacity};
use crate::object::Object;
use crate::parse::{DecodeContext, Item, ParseOutcome};
use crate::profile::CodecProfile;
use crate::stream::StreamDecoder;
use crate::value::Value;
use crate::{DecodeLimits, Error, ErrorCode, UnpackError};

/// Convert a parsed object into an owned [`Value`].
///
/// Integers are range-checked against the profile width whatever their wire form. `float32` is
/// widened to `f64`. `str` and `bin` both become [`Value::Bytes`]. Arrays and maps keep their
/// wire order.
///
/// # Errors
///
/// Returns `IntegerOutOfRange` for an integer outside the profile width, `UnsupportedType` with
/// the marker byte for an extension object, or an out-of-memory error. When several nodes are
/// invalid the first one in wire order is reported.
pub fn to_value(object: Object<'_>, profile: CodecProfile) -> Result<Value, Error> {
    let (start, end) = object.node_range();
    let nodes = &object.nodes()[start..end];
    let data = object.data();
    let width = profile.int_width;

    for node in nodes {
        match node.item {
            Item::Uint(v) if !width.contains_unsigned(v) => {
                return Err(Error::new(ErrorCode::IntegerOutOfRange, node.offset));
            }
            Item::Int(v) if !width.contains(v) => {
                return Err(Error::new(ErrorCode::IntegerOutOfRange, node.offset));
            }
            Item::Ext { marker, .. } => {
                return Err(Error::new(ErrorCode::UnsupportedType(marker), node.offset));
            }
            _ => {}
        }
    }

    // Walking the arena in reverse pre-order leaves a container's children on top of the stack
    // with its first child topmost.
    let mut stack: Vec<Value> = Vec::new();
    for node in nodes.iter().rev() {
        let off = node.offset;
        let value = match node.item {
            Item::Nil => Value::Nil,
            Item::Bool(b) => Value::Bool(b),
            #[allow(clippy::cast_possible_wrap)]
            Item::Uint(v) => Value::Int(v as i64),
            Item::Int(v) => Value::Int(v),
            Item::F32(v) => Value::Float(f64::from(v)),
            Item::F64(v) => Value::Float(v),
            Item::Str { start, len } | Item::Bin { start, len } => {
                Value::Bytes(try_vec_from_slice(&data[start..start + len], off)?)
            }
            Item::Array { len: 0, .. } => Value::Array(Vec::new()),
            Item::Map { len: 0, .. } => Value::Map(Vec::new()),
            Item::Array { len, .. } => {
                let mut items = try_vec_with_capacity(len, off)?;
                for _ in 0..len {
                    try_push(&mut items, pop(&mut stack, off)?, off)?;
                }
                Value::Array(items)
            }
            Item::Map { len, .. } => {
                let mut entries = try_vec_with_capacity(len, off)?;
                for _ in 0..len {
                    let key = pop(&mut stack, off)?;
                    let value = pop(&mut stack, off)?;
                    try_push(&mut entries, (key, value), off)?;
                }
                Value::Map(entries)
            }
            Item::Ext { marker, .. } => {
                return Err(Error::new(ErrorCode::UnsupportedType(marker), off));
            }
        };
        try_push(&mut stack, value, off)?;
    }

    pop(&mut stack, object.offset())
}

fn pop(stack: &mut Vec<Value>, off: usize) -> Result<Value, Error> {
    stack
        .pop()
        .ok_or_else(|| Error::new(ErrorCode::UnexpectedEof, off))
}

/// Decode exactly one value with the default profile and limits.
///
/// # Errors
///
/// Returns `UnexpectedEof` if the input holds no complete value, `TrailingBytes` if bytes follow
/// the value, or any parse or conversion error.
pub fn decode(bytes: &[u8]) -> Result<Value, Error> {
    decode_with(bytes, CodecProfile::DEFAULT, DecodeLimits::UNBOUNDED)
}

/// Decode exactly one value with an explicit profile and limits.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_with(
    bytes: &[u8],
    profile: CodecProfile,
    limits: DecodeLimits,
) -> Result<Value, Error> {
    let mut ctx = DecodeContext::with_limits(limits);
    let value = match ctx.parse_next(bytes, 0) {
        ParseOutcome::Success { object, consumed } => {
            if consumed != bytes.len() {
                return Err(Error::new(ErrorCode::TrailingBytes, consumed));
            }
            to_value(object, profile)?
        }
        ParseOutcome::Incomplete => {
            return Err(Error::new(ErrorCode::UnexpectedEof, bytes.len()));
        }
        ParseOutcome::ParseError(err) | ParseOutcome::OutOfMemory(err) => return Err(err),
    };
    ctx.destroy();
    Ok(value)
}

/// Decode every complete value in `bytes`. An incomplete tail is ignored.
///
/// # Errors
///
/// Returns the first parse or conversion error.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<Value>, Error> {
    let mut out = Vec::new();
    let consumer = |value: Value| try_push(&mut out, value, 0);
    match StreamDecoder::new().unpack(bytes, Some(consumer)) {
        Ok(_) => Ok(out),
        Err(UnpackError::Codec(err) | UnpackError::Fatal(err) | UnpackError::Consumer(err)) => {
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{FloatWidth, IntWidth};
    use crate::ErrorKind;
    use alloc::vec;

    const W16: CodecProfile = CodecProfile::new(IntWidth::W16, FloatWidth::F64);

    #[test]
    fn nested_order_is_preserved() {
        // {"k": [1, [], {}], 2: "v"}
        let data = [
            0x82, 0xa1, b'k', 0x93, 0x01, 0x90, 0x80, 0x02, 0xa1, b'v',
        ];
        assert_eq!(
            decode(&data).unwrap(),
            Value::Map(vec![
                (
                    Value::text("k"),
                    Value::Array(vec![
                        Value::Int(1),
                        Value::Array(vec![]),
                        Value::Map(vec![])
                    ])
                ),
                (Value::Int(2), Value::text("v")),
            ])
        );
    }

    #[test]
    fn first_out_of_range_integer_is_reported() {
        // [1, 40000, -40000]
        let data = [
            0x93, 0x01, 0xcd, 0x9c, 0x40, 0xd2, 0xff, 0xff, 0x63, 0xc0,
        ];
        let err = decode_with(&data, W16, DecodeLimits::UNBOUNDED).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.offset, 2);
        assert_eq!(decode(&data).unwrap().as_array().map(<[_]>::len), Some(3));
    }

    #[test]
    fn ext_names_its_marker() {
        let err = decode(&[0x91, 0xc7, 0x00, 0x05]).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedType(0xc7));
        assert_eq!(err.offset, 1);
    }

    #[test]
    fn single_value_framing() {
        assert_eq!(decode(&[0xc0, 0xc0]).unwrap_err().code, ErrorCode::TrailingBytes);
        assert_eq!(decode(&[0x92, 0xc0]).unwrap_err().code, ErrorCode::UnexpectedEof);
        assert_eq!(decode(&[]).unwrap_err().code, ErrorCode::UnexpectedEof);
    }

    #[test]
    fn float32_widens() {
        let data = [0xca, 0x3f, 0xc0, 0x00, 0x00];
        assert_eq!(decode(&data).unwrap(), Value::Float(1.5));
    }

    #[test]
    fn decode_all_skips_incomplete_tail() {
        let values = decode_all(&[0x01, 0xc3, 0x92, 0x01]).unwrap();
        assert_eq!(values, vec![Value::Int(1), Value::Bool(true)]);
    }
}
