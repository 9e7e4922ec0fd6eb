use alloc::vec::Vec;

use crate::alloc_util::try_push;
use crate::object::Object;
use crate::wire::{Cursor, Header};
use crate::{DecodeLimits, Error, ErrorCode};

/// One parsed wire item. Payloads are byte ranges into the input buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Item {
    Nil,
    Bool(bool),
    Uint(u64),
    Int(i64),
    F32(f32),
    F64(f64),
    Str { start: usize, len: usize },
    Bin { start: usize, len: usize },
    /// `end` is the arena index one past the last descendant.
    Array { len: usize, end: usize },
    Map { len: usize, end: usize },
    Ext { marker: u8, start: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Node {
    pub(crate) offset: usize,
    pub(crate) item: Item,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    remaining: usize,
}

/// Result of one [`DecodeContext::parse_next`] attempt.
#[derive(Debug, Clone, Copy)]
pub enum ParseOutcome<'a> {
    /// A complete value was parsed.
    Success {
        /// View over the parsed value.
        object: Object<'a>,
        /// Number of input bytes the value occupies.
        consumed: usize,
    },
    /// The bytes from the offset do not yet hold a complete value. Not an error.
    Incomplete,
    /// The input is malformed or violates the decode limits.
    ParseError(Error),
    /// Allocation failed while recording the parse.
    OutOfMemory(Error),
}

impl ParseOutcome<'_> {
    fn from_error(err: Error) -> Self {
        match err.code {
            ErrorCode::UnexpectedEof => Self::Incomplete,
            _ if err.is_fatal() => Self::OutOfMemory(err),
            _ => Self::ParseError(err),
        }
    }
}

/// Reusable parse scratch: a frame stack and an arena of parsed nodes.
///
/// A context belongs to one caller at a time. It is created with [`DecodeContext::new`], may be
/// [`reset`](DecodeContext::reset) between parse sequences, and is released with
/// [`destroy`](DecodeContext::destroy) (or by dropping it).
#[derive(Debug, Default)]
pub struct DecodeContext {
    limits: DecodeLimits,
    nodes: Vec<Node>,
    stack: Vec<Frame>,
}

impl DecodeContext {
    /// Create a context with [`DecodeLimits::UNBOUNDED`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_limits(DecodeLimits::UNBOUNDED)
    }

    /// Create a context with explicit limits.
    #[must_use]
    pub const fn with_limits(limits: DecodeLimits) -> Self {
        Self {
            limits,
            nodes: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// The limits this context enforces.
    #[inline]
    #[must_use]
    pub const fn limits(&self) -> DecodeLimits {
        self.limits
    }

    /// Clear all parse state, keeping allocated capacity.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.stack.clear();
    }

    /// Clear all parse state and free the scratch storage.
    ///
    /// The context stays usable; the next parse allocates again.
    pub fn release(&mut self) {
        self.nodes = Vec::new();
        self.stack = Vec::new();
    }

    /// Release the context.
    pub fn destroy(mut self) {
        self.release();
    }

    /// Parse the next complete value of `data` starting at `offset`.
    ///
    /// The returned object borrows this context, so it must be dropped before the next attempt.
    /// An `offset` at or past the end of `data` is [`ParseOutcome::Incomplete`].
    pub fn parse_next<'a>(&'a mut self, data: &'a [u8], offset: usize) -> ParseOutcome<'a> {
        self.reset();
        match self.parse_tree(data, offset) {
            Ok(consumed) => ParseOutcome::Success {
                object: Object::new(&self.nodes, data, 0),
                consumed,
            },
            Err(err) => ParseOutcome::from_error(err),
        }
    }

    fn parse_tree(&mut self, data: &[u8], offset: usize) -> Result<usize, Error> {
        let mut cur = Cursor::new(data, offset);

        loop {
            let off = cur.position();
            let header = cur.read_header()?;
            self.check_message_len(offset, cur.position())?;
            let idx = self.nodes.len();
            let (item, children) = self.item_for(&mut cur, header, offset, off)?;
            try_push(&mut self.nodes, Node { offset: off, item }, off)?;

            if children > 0 {
                try_push(
                    &mut self.stack,
                    Frame {
                        node: idx,
                        remaining: children,
                    },
                    off,
                )?;
                continue;
            }

            if self.complete_item() {
                return Ok(cur.position() - offset);
            }
        }
    }

    /// Record one finished item in the enclosing frames. Returns `true` once the root is done.
    fn complete_item(&mut self) -> bool {
        let end = self.nodes.len();
        while let Some(frame) = self.stack.last_mut() {
            frame.remaining -= 1;
            if frame.remaining > 0 {
                return false;
            }
            let node = frame.node;
            self.stack.pop();
            if let Item::Array { end: e, .. } | Item::Map { end: e, .. } = &mut self.nodes[node].item
            {
                *e = end;
            }
        }
        true
    }

    /// `max_input_bytes` bounds one value, measured from its first byte at `start`.
    fn check_message_len(&self, start: usize, end: usize) -> Result<(), Error> {
        if end - start > self.limits.max_input_bytes {
            return Err(Error::new(ErrorCode::MessageLenLimitExceeded, start));
        }
        Ok(())
    }

    fn check_payload(
        &self,
        cur: &Cursor<'_>,
        start: usize,
        len: usize,
        off: usize,
    ) -> Result<(), Error> {
        self.check_message_len(start, cur.position().saturating_add(len))?;
        check_bytes_len(&self.limits, len, off)
    }

    fn item_for(
        &self,
        cur: &mut Cursor<'_>,
        header: Header,
        start: usize,
        off: usize,
    ) -> Result<(Item, usize), Error> {
        let limits = &self.limits;
        let item = match header {
            Header::Nil => Item::Nil,
            Header::Bool(b) => Item::Bool(b),
            Header::Uint(v) => Item::Uint(v),
            Header::Int(v) => Item::Int(v),
            Header::F32(v) => Item::F32(v),
            Header::F64(v) => Item::F64(v),
            Header::Str(len) => {
                self.check_payload(cur, start, len, off)?;
                Item::Str {
                    start: cur.skip(len)?,
                    len,
                }
            }
            Header::Bin(len) => {
                self.check_payload(cur, start, len, off)?;
                Item::Bin {
                    start: cur.skip(len)?,
                    len,
                }
            }
            Header::Ext { marker, len } => {
                let total = len
                    .checked_add(1)
                    .ok_or_else(|| Error::new(ErrorCode::LengthOverflow, off))?;
                self.check_message_len(start, cur.position().saturating_add(total))?;
                check_bytes_len(limits, len, off)?;
                Item::Ext {
                    marker,
                    start: cur.skip(total)?,
                    len,
                }
            }
            Header::Array(len) => {
                if len > limits.max_array_len {
                    return Err(Error::new(ErrorCode::ArrayLenLimitExceeded, off));
                }
                self.enter_container(len, off)?;
                return Ok((Item::Array { len, end: 0 }, len));
            }
            Header::Map(len) => {
                if len > limits.max_map_len {
                    return Err(Error::new(ErrorCode::MapLenLimitExceeded, off));
                }
                let children = len
                    .checked_mul(2)
                    .ok_or_else(|| Error::new(ErrorCode::LengthOverflow, off))?;
                self.enter_container(children, off)?;
                return Ok((Item::Map { len, end: 0 }, children));
            }
        };
        Ok((item, 0))
    }

    fn enter_container(&self, children: usize, off: usize) -> Result<(), Error> {
        if children > 0 && self.stack.len() + 1 > self.limits.max_depth {
            return Err(Error::new(ErrorCode::DepthLimitExceeded, off));
        }
        Ok(())
    }
}

fn check_bytes_len(limits: &DecodeLimits, len: usize, off: usize) -> Result<(), Error> {
    if len > limits.max_bytes_len {
        return Err(Error::new(ErrorCode::BytesLenLimitExceeded, off));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consumed(ctx: &mut DecodeContext, data: &[u8], offset: usize) -> Option<usize> {
        match ctx.parse_next(data, offset) {
            ParseOutcome::Success { consumed, .. } => Some(consumed),
            _ => None,
        }
    }

    #[test]
    fn nested_containers_close_in_order() {
        let mut ctx = DecodeContext::new();
        // [1, [2, 3], {4: 5}] followed by nil
        let data = [0x93, 0x01, 0x92, 0x02, 0x03, 0x81, 0x04, 0x05, 0xc0];
        assert_eq!(consumed(&mut ctx, &data, 0), Some(8));
        assert_eq!(ctx.nodes.len(), 8);
        assert_eq!(ctx.nodes[0].item, Item::Array { len: 3, end: 8 });
        assert_eq!(ctx.nodes[2].item, Item::Array { len: 2, end: 5 });
        assert_eq!(ctx.nodes[5].item, Item::Map { len: 1, end: 8 });
        assert_eq!(consumed(&mut ctx, &data, 8), Some(1));
    }

    #[test]
    fn truncation_is_incomplete() {
        let mut ctx = DecodeContext::new();
        for data in [&[0x92, 0x01][..], &[0xa3, b'a'], &[0xd2, 0, 0], &[], &[0xd4, 0x01]] {
            assert!(matches!(ctx.parse_next(data, 0), ParseOutcome::Incomplete));
        }
    }

    #[test]
    fn huge_claimed_count_reads_children_until_eof() {
        let mut ctx = DecodeContext::new();
        let data = [0xdd, 0xff, 0xff, 0xff, 0xff, 0x01];
        assert!(matches!(ctx.parse_next(&data, 0), ParseOutcome::Incomplete));
        assert!(ctx.nodes.capacity() < 16);

        // The count alone never hides a bad child.
        match ctx.parse_next(&[0x92, 0xc1], 0) {
            ParseOutcome::ParseError(err) => {
                assert_eq!(err.code, ErrorCode::ReservedMarker);
                assert_eq!(err.offset, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn message_len_is_measured_from_the_offset() {
        let limits = DecodeLimits {
            max_input_bytes: 3,
            ..DecodeLimits::UNBOUNDED
        };
        let mut ctx = DecodeContext::with_limits(limits);
        // Two 3-byte values: each fits on its own.
        let data = [0xa2, b'a', b'b', 0x92, 0x01, 0x02];
        assert_eq!(consumed(&mut ctx, &data, 0), Some(3));
        assert_eq!(consumed(&mut ctx, &data, 3), Some(3));

        let cases: [&[u8]; 3] = [
            &[0x93, 0x01, 0x02, 0x03],
            &[0xa3, b'a'],
            &[0xd5, 0x01],
        ];
        for data in cases {
            match ctx.parse_next(data, 0) {
                ParseOutcome::ParseError(err) => {
                    assert_eq!(err.code, ErrorCode::MessageLenLimitExceeded);
                    assert_eq!(err.offset, 0);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn limits_are_parse_errors() {
        let limits = DecodeLimits {
            max_depth: 1,
            max_array_len: 2,
            max_bytes_len: 2,
            ..DecodeLimits::UNBOUNDED
        };
        let mut ctx = DecodeContext::with_limits(limits);
        let cases: [(&[u8], ErrorCode); 3] = [
            (&[0x91, 0x91, 0x01], ErrorCode::DepthLimitExceeded),
            (&[0x93, 0x01, 0x02, 0x03], ErrorCode::ArrayLenLimitExceeded),
            (&[0xa3, b'a', b'b', b'c'], ErrorCode::BytesLenLimitExceeded),
        ];
        for (data, code) in cases {
            match ctx.parse_next(data, 0) {
                ParseOutcome::ParseError(err) => assert_eq!(err.code, code),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn reserved_marker_inside_container() {
        let mut ctx = DecodeContext::new();
        match ctx.parse_next(&[0x92, 0x01, 0xc1], 0) {
            ParseOutcome::ParseError(err) => {
                assert_eq!(err.code, ErrorCode::ReservedMarker);
                assert_eq!(err.offset, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn release_frees_storage_and_stays_usable() {
        let mut ctx = DecodeContext::new();
        assert_eq!(consumed(&mut ctx, &[0x92, 0x01, 0x02], 0), Some(3));
        ctx.release();
        assert_eq!(ctx.nodes.capacity(), 0);
        assert_eq!(consumed(&mut ctx, &[0xc3], 0), Some(1));
        ctx.destroy();
    }
}
