use alloc::vec::Vec;

use rmp::Marker;

use crate::alloc_util::try_reserve;
use crate::codec::IntoValue;
use crate::packed::PackedBytes;
use crate::profile::{CodecProfile, FloatWidth, IntWidth};
use crate::utf8::is_valid_utf8;
use crate::value::Value;
use crate::{Error, ErrorCode};

/// Growable output buffer; every write reserves fallibly.
struct OutBuf {
    bytes: Vec<u8>,
}

impl OutBuf {
    const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    fn with_capacity(capacity: usize) -> Self {
        let mut bytes = Vec::new();
        // A failed pre-allocation is retried, and reported, by the first write.
        let _ = bytes.try_reserve(capacity);
        Self { bytes }
    }

    fn grow_for(&mut self, additional: usize) -> Result<(), Error> {
        if self.bytes.capacity() - self.bytes.len() >= additional {
            return Ok(());
        }
        let at = self.bytes.len();
        try_reserve(&mut self.bytes, additional, at)
    }

    fn put(&mut self, data: &[u8]) -> Result<(), Error> {
        self.grow_for(data.len())?;
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    fn put_u8(&mut self, byte: u8) -> Result<(), Error> {
        self.grow_for(1)?;
        self.bytes.push(byte);
        Ok(())
    }

    fn put_marker(&mut self, marker: Marker) -> Result<(), Error> {
        self.put_u8(marker.to_u8())
    }

    fn error(&self, code: ErrorCode) -> Error {
        Error::new(code, self.bytes.len())
    }
}

fn write_marker_arg(out: &mut OutBuf, marker: Marker, arg: &[u8]) -> Result<(), Error> {
    out.put_marker(marker)?;
    out.put(arg)
}

/// Write a length header choosing the smallest of the fix/8/16/32 forms available to the family.
fn encode_len(
    out: &mut OutBuf,
    len: usize,
    fix: Option<(u8, fn(u8) -> Marker)>,
    m8: Option<Marker>,
    m16: Marker,
    m32: Marker,
) -> Result<(), Error> {
    if let Some((fix_max, fix_marker)) = fix {
        if let Ok(n) = u8::try_from(len) {
            if n <= fix_max {
                return out.put_marker(fix_marker(n));
            }
        }
    }
    if let Some(m8) = m8 {
        if let Ok(n) = u8::try_from(len) {
            return write_marker_arg(out, m8, &[n]);
        }
    }
    if let Ok(n) = u16::try_from(len) {
        return write_marker_arg(out, m16, &n.to_be_bytes());
    }
    let n = u32::try_from(len).map_err(|_| out.error(ErrorCode::LengthOverflow))?;
    write_marker_arg(out, m32, &n.to_be_bytes())
}

fn encode_str_header(out: &mut OutBuf, len: usize) -> Result<(), Error> {
    encode_len(
        out,
        len,
        Some((31, Marker::FixStr)),
        Some(Marker::Str8),
        Marker::Str16,
        Marker::Str32,
    )
}

fn encode_bin_header(out: &mut OutBuf, len: usize) -> Result<(), Error> {
    encode_len(
        out,
        len,
        None,
        Some(Marker::Bin8),
        Marker::Bin16,
        Marker::Bin32,
    )
}

fn encode_array_header(out: &mut OutBuf, len: usize) -> Result<(), Error> {
    encode_len(
        out,
        len,
        Some((15, Marker::FixArray)),
        None,
        Marker::Array16,
        Marker::Array32,
    )
}

fn encode_map_header(out: &mut OutBuf, len: usize) -> Result<(), Error> {
    encode_len(
        out,
        len,
        Some((15, Marker::FixMap)),
        None,
        Marker::Map16,
        Marker::Map32,
    )
}

fn encode_int(out: &mut OutBuf, width: IntWidth, v: i64) -> Result<(), Error> {
    match width {
        IntWidth::W16 => {
            let n = i16::try_from(v).map_err(|_| out.error(ErrorCode::IntegerOutOfRange))?;
            write_marker_arg(out, Marker::I16, &n.to_be_bytes())
        }
        IntWidth::W32 => {
            let n = i32::try_from(v).map_err(|_| out.error(ErrorCode::IntegerOutOfRange))?;
            write_marker_arg(out, Marker::I32, &n.to_be_bytes())
        }
        IntWidth::W64 => write_marker_arg(out, Marker::I64, &v.to_be_bytes()),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn encode_float(out: &mut OutBuf, width: FloatWidth, v: f64) -> Result<(), Error> {
    match width {
        FloatWidth::F32 => {
            let narrowed = v as f32;
            write_marker_arg(out, Marker::F32, &narrowed.to_bits().to_be_bytes())
        }
        FloatWidth::F64 => write_marker_arg(out, Marker::F64, &v.to_bits().to_be_bytes()),
    }
}

fn encode_byte_string(out: &mut OutBuf, bytes: &[u8]) -> Result<(), Error> {
    if is_valid_utf8(bytes) {
        encode_str_header(out, bytes.len())?;
    } else {
        encode_bin_header(out, bytes.len())?;
    }
    out.put(bytes)
}

fn encode_value(out: &mut OutBuf, profile: CodecProfile, value: &Value) -> Result<(), Error> {
    match value {
        Value::Nil => out.put_marker(Marker::Null),
        Value::Bool(true) => out.put_marker(Marker::True),
        Value::Bool(false) => out.put_marker(Marker::False),
        Value::Int(v) => encode_int(out, profile.int_width, *v),
        Value::Float(v) => encode_float(out, profile.float_width, *v),
        Value::Bytes(b) => encode_byte_string(out, b),
        Value::Array(items) => {
            encode_array_header(out, items.len())?;
            for item in items {
                encode_value(out, profile, item)?;
            }
            Ok(())
        }
        Value::Map(entries) => {
            encode_map_header(out, entries.len())?;
            for (k, v) in entries {
                encode_value(out, profile, k)?;
                encode_value(out, profile, v)?;
            }
            Ok(())
        }
    }
}

/// Encoder that writes MessagePack directly into a `Vec<u8>`.
///
/// Integers and floats are always written in the fixed width of the encoder's
/// [`CodecProfile`]. Byte strings are written as `str` when they are valid UTF-8 and as `bin`
/// otherwise.
///
/// On error the bytes written so far stay in the buffer; they do not form a valid encoding and
/// should be discarded.
pub struct Encoder {
    out: OutBuf,
    profile: CodecProfile,
}

impl Encoder {
    /// Create an encoder with the default profile.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_profile(CodecProfile::DEFAULT)
    }

    /// Create an encoder with an explicit profile.
    #[must_use]
    pub const fn with_profile(profile: CodecProfile) -> Self {
        Self {
            out: OutBuf::new(),
            profile,
        }
    }

    /// Create an encoder with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(profile: CodecProfile, capacity: usize) -> Self {
        Self {
            out: OutBuf::with_capacity(capacity),
            profile,
        }
    }

    /// The profile used by this encoder.
    #[must_use]
    pub const fn profile(&self) -> CodecProfile {
        self.profile
    }

    /// Return the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.out.bytes.len()
    }

    /// Returns `true` if no bytes have been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.out.bytes.is_empty()
    }

    /// Borrow the bytes emitted so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.out.bytes
    }

    /// Consume and return the encoded bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.out.bytes
    }

    /// Consume and return the encoded bytes as [`PackedBytes`].
    #[must_use]
    pub fn into_packed(self) -> PackedBytes {
        PackedBytes::new(self.into_vec())
    }

    /// Encode a whole value tree.
    ///
    /// # Errors
    ///
    /// Returns `IntegerOutOfRange` if an integer does not fit the profile width, or an
    /// out-of-memory error if the buffer cannot grow.
    pub fn value(&mut self, value: &Value) -> Result<(), Error> {
        encode_value(&mut self.out, self.profile, value)
    }

    /// Encode nil.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying buffer fails.
    pub fn nil(&mut self) -> Result<(), Error> {
        self.out.put_marker(Marker::Null)
    }

    /// Encode a boolean.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying buffer fails.
    pub fn bool(&mut self, v: bool) -> Result<(), Error> {
        let marker = if v { Marker::True } else { Marker::False };
        self.out.put_marker(marker)
    }

    /// Encode an integer in the profile's fixed width.
    ///
    /// # Errors
    ///
    /// Returns `IntegerOutOfRange` if `v` does not fit the width.
    pub fn int(&mut self, v: i64) -> Result<(), Error> {
        encode_int(&mut self.out, self.profile.int_width, v)
    }

    /// Encode a float in the profile's precision.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying buffer fails.
    pub fn float(&mut self, v: f64) -> Result<(), Error> {
        encode_float(&mut self.out, self.profile.float_width, v)
    }

    /// Encode a byte string as `str` or `bin` depending on UTF-8 validity.
    ///
    /// # Errors
    ///
    /// Returns an error if the length exceeds `u32::MAX` or writing fails.
    pub fn bytes(&mut self, b: &[u8]) -> Result<(), Error> {
        encode_byte_string(&mut self.out, b)
    }

    /// Write an array header; exactly `len` values must follow.
    ///
    /// # Errors
    ///
    /// Returns an error if the length exceeds `u32::MAX` or writing fails.
    pub fn array_header(&mut self, len: usize) -> Result<(), Error> {
        encode_array_header(&mut self.out, len)
    }

    /// Write a map header; exactly `len` key/value pairs must follow.
    ///
    /// # Errors
    ///
    /// Returns an error if the length exceeds `u32::MAX` or writing fails.
    pub fn map_header(&mut self, len: usize) -> Result<(), Error> {
        encode_map_header(&mut self.out, len)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a value with the default profile (64-bit integers, double precision floats).
///
/// # Errors
///
/// Returns an error if allocation fails.
pub fn pack(value: &Value) -> Result<Vec<u8>, Error> {
    pack_with(value, CodecProfile::DEFAULT)
}

/// Encode a value with an explicit profile.
///
/// # Errors
///
/// Returns `IntegerOutOfRange` if an integer does not fit the profile width, or an
/// out-of-memory error.
pub fn pack_with(value: &Value, profile: CodecProfile) -> Result<Vec<u8>, Error> {
    let mut enc = Encoder::with_profile(profile);
    enc.value(value)?;
    Ok(enc.into_vec())
}

/// Coerce any [`IntoValue`] type into a [`Value`], then encode it.
///
/// A coercion failure is returned exactly as [`IntoValue::into_value`] produced it.
///
/// # Errors
///
/// Returns the coercion error, or any encoding error of [`pack_with`].
pub fn pack_any<T: IntoValue>(value: T, profile: CodecProfile) -> Result<Vec<u8>, Error> {
    let value = value.into_value()?;
    pack_with(&value, profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn str_header_forms() {
        let mut out = OutBuf::new();
        encode_str_header(&mut out, 31).unwrap();
        encode_str_header(&mut out, 32).unwrap();
        encode_str_header(&mut out, 256).unwrap();
        encode_str_header(&mut out, 65_536).unwrap();
        assert_eq!(
            out.bytes,
            vec![0xbf, 0xd9, 0x20, 0xda, 0x01, 0x00, 0xdb, 0x00, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn bin_header_has_no_fix_form() {
        let mut out = OutBuf::new();
        encode_bin_header(&mut out, 0).unwrap();
        encode_bin_header(&mut out, 300).unwrap();
        assert_eq!(out.bytes, vec![0xc4, 0x00, 0xc5, 0x01, 0x2c]);
    }

    #[test]
    fn container_header_forms() {
        let mut out = OutBuf::new();
        encode_array_header(&mut out, 15).unwrap();
        encode_array_header(&mut out, 16).unwrap();
        encode_map_header(&mut out, 0).unwrap();
        encode_map_header(&mut out, 70_000).unwrap();
        assert_eq!(
            out.bytes,
            vec![0x9f, 0xdc, 0x00, 0x10, 0x80, 0xdf, 0x00, 0x01, 0x11, 0x70]
        );
    }

    #[test]
    fn narrow_width_rejects_out_of_range_int() {
        let profile = CodecProfile::new(IntWidth::W16, FloatWidth::F64);
        let mut enc = Encoder::with_profile(profile);
        enc.int(-32_768).unwrap();
        let err = enc.int(32_768).unwrap_err();
        assert_eq!(err.code, ErrorCode::IntegerOutOfRange);
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn capacity_is_only_a_hint() {
        let mut enc = Encoder::with_capacity(CodecProfile::DEFAULT, 2);
        enc.bytes(b"hallo").unwrap();
        enc.nil().unwrap();
        assert_eq!(enc.len(), 7);
        assert_eq!(enc.as_bytes(), b"\xa5hallo\xc0");
    }
}
