//! MessagePack framing primitives.
//!
//! Markers are classified with [`rmp::Marker`]. Every read is bounds checked; running off the end
//! of the input yields [`ErrorCode::UnexpectedEof`], which the decode context reports as
//! incomplete input rather than as an error.

use rmp::Marker;

use crate::{Error, ErrorCode};

/// Header of one wire item, as far as it can be known from the marker and its length field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Header {
    Nil,
    Bool(bool),
    Uint(u64),
    Int(i64),
    F32(f32),
    F64(f64),
    Str(usize),
    Bin(usize),
    Array(usize),
    Map(usize),
    Ext { marker: u8, len: usize },
}

#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub const fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub const fn position(&self) -> usize {
        self.pos
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let off = self.pos;
        let b = *self
            .data
            .get(self.pos)
            .ok_or_else(|| Error::new(ErrorCode::UnexpectedEof, off))?;
        self.pos += 1;
        Ok(b)
    }

    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let off = self.pos;
        let end = self
            .pos
            .checked_add(n)
            .ok_or_else(|| Error::new(ErrorCode::LengthOverflow, off))?;
        if end > self.data.len() {
            return Err(Error::new(ErrorCode::UnexpectedEof, off));
        }
        let s = &self.data[self.pos..end];
        self.pos = end;
        Ok(s)
    }

    /// Skip `n` payload bytes, returning the offset of the first one.
    pub fn skip(&mut self, n: usize) -> Result<usize, Error> {
        let start = self.pos;
        self.read_exact(n)?;
        Ok(start)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let s = self.read_exact(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(s);
        Ok(out)
    }

    pub fn read_be_u16(&mut self) -> Result<u16, Error> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_be_u32(&mut self) -> Result<u32, Error> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_be_u64(&mut self) -> Result<u64, Error> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    fn read_len_u8(&mut self) -> Result<usize, Error> {
        Ok(usize::from(self.read_u8()?))
    }

    fn read_len_u16(&mut self) -> Result<usize, Error> {
        Ok(usize::from(self.read_be_u16()?))
    }

    fn read_len_u32(&mut self, off: usize) -> Result<usize, Error> {
        let len = self.read_be_u32()?;
        usize::try_from(len).map_err(|_| Error::new(ErrorCode::LengthOverflow, off))
    }

    /// Read a marker and its fixed-size arguments. Payloads are not consumed.
    pub fn read_header(&mut self) -> Result<Header, Error> {
        let off = self.pos;
        let marker = Marker::from_u8(self.read_u8()?);
        let header = match marker {
            Marker::Null => Header::Nil,
            Marker::False => Header::Bool(false),
            Marker::True => Header::Bool(true),

            Marker::FixPos(v) => Header::Uint(u64::from(v)),
            Marker::U8 => Header::Uint(u64::from(self.read_u8()?)),
            Marker::U16 => Header::Uint(u64::from(self.read_be_u16()?)),
            Marker::U32 => Header::Uint(u64::from(self.read_be_u32()?)),
            Marker::U64 => Header::Uint(self.read_be_u64()?),

            Marker::FixNeg(v) => Header::Int(i64::from(v)),
            Marker::I8 => Header::Int(i64::from(i8::from_be_bytes(self.read_array()?))),
            Marker::I16 => Header::Int(i64::from(i16::from_be_bytes(self.read_array()?))),
            Marker::I32 => Header::Int(i64::from(i32::from_be_bytes(self.read_array()?))),
            Marker::I64 => Header::Int(i64::from_be_bytes(self.read_array()?)),

            Marker::F32 => Header::F32(f32::from_bits(self.read_be_u32()?)),
            Marker::F64 => Header::F64(f64::from_bits(self.read_be_u64()?)),

            Marker::FixStr(n) => Header::Str(usize::from(n)),
            Marker::Str8 => Header::Str(self.read_len_u8()?),
            Marker::Str16 => Header::Str(self.read_len_u16()?),
            Marker::Str32 => Header::Str(self.read_len_u32(off)?),

            Marker::Bin8 => Header::Bin(self.read_len_u8()?),
            Marker::Bin16 => Header::Bin(self.read_len_u16()?),
            Marker::Bin32 => Header::Bin(self.read_len_u32(off)?),

            Marker::FixArray(n) => Header::Array(usize::from(n)),
            Marker::Array16 => Header::Array(self.read_len_u16()?),
            Marker::Array32 => Header::Array(self.read_len_u32(off)?),

            Marker::FixMap(n) => Header::Map(usize::from(n)),
            Marker::Map16 => Header::Map(self.read_len_u16()?),
            Marker::Map32 => Header::Map(self.read_len_u32(off)?),

            // The extension type byte is part of the payload: len + 1 bytes follow.
            Marker::FixExt1 => ext(marker, 1),
            Marker::FixExt2 => ext(marker, 2),
            Marker::FixExt4 => ext(marker, 4),
            Marker::FixExt8 => ext(marker, 8),
            Marker::FixExt16 => ext(marker, 16),
            Marker::Ext8 => ext(marker, self.read_len_u8()?),
            Marker::Ext16 => ext(marker, self.read_len_u16()?),
            Marker::Ext32 => ext(marker, self.read_len_u32(off)?),

            Marker::Reserved => return Err(Error::new(ErrorCode::ReservedMarker, off)),
        };
        Ok(header)
    }
}

fn ext(marker: Marker, len: usize) -> Header {
    Header::Ext {
        marker: marker.to_u8(),
        len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(bytes: &[u8]) -> Result<Header, Error> {
        Cursor::new(bytes, 0).read_header()
    }

    #[test]
    fn integer_headers() {
        assert_eq!(header(&[0x7f]).unwrap(), Header::Uint(127));
        assert_eq!(header(&[0xe0]).unwrap(), Header::Int(-32));
        assert_eq!(header(&[0xcc, 0xff]).unwrap(), Header::Uint(255));
        assert_eq!(header(&[0xd0, 0x80]).unwrap(), Header::Int(-128));
        assert_eq!(header(&[0xd1, 0x80, 0x00]).unwrap(), Header::Int(-32_768));
        assert_eq!(
            header(&[0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]).unwrap(),
            Header::Uint(u64::MAX)
        );
    }

    #[test]
    fn truncated_argument_is_eof() {
        let err = header(&[0xcd, 0x01]).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedEof);
        assert_eq!(err.offset, 1);
    }

    #[test]
    fn reserved_marker_is_malformed() {
        let err = header(&[0xc1]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservedMarker);
    }

    #[test]
    fn ext_headers_carry_marker() {
        assert_eq!(
            header(&[0xd4, 0x01, 0x00]).unwrap(),
            Header::Ext {
                marker: 0xd4,
                len: 1
            }
        );
        assert_eq!(
            header(&[0xc7, 0x03]).unwrap(),
            Header::Ext {
                marker: 0xc7,
                len: 3
            }
        );
    }
}
