//! Borrowed views over values parsed by a [`crate::DecodeContext`].

use core::iter::FusedIterator;

use crate::parse::{Item, Node};
use crate::profile::CodecProfile;
use crate::value::Value;
use crate::Error;

/// A parsed wire object borrowed from a decode context and its input buffer.
#[derive(Clone, Copy)]
pub struct Object<'a> {
    nodes: &'a [Node],
    data: &'a [u8],
    idx: usize,
}

/// The shape of an [`Object`], with payloads borrowed from the input.
#[derive(Debug, Clone, Copy)]
pub enum ObjectKind<'a> {
    /// `nil`.
    Nil,
    /// `true` / `false`.
    Bool(bool),
    /// A non-negative integer, whatever its wire form.
    PositiveInteger(u64),
    /// A negative integer.
    NegativeInteger(i64),
    /// `float32`.
    Float32(f32),
    /// `float64`.
    Float64(f64),
    /// A `str` payload. Its UTF-8 validity is not checked.
    Str(&'a [u8]),
    /// A `bin` payload.
    Bin(&'a [u8]),
    /// An array.
    Array(ArrayIter<'a>),
    /// A map.
    Map(MapIter<'a>),
    /// An extension object.
    Ext {
        /// The application-defined type byte.
        type_id: i8,
        /// The payload after the type byte.
        data: &'a [u8],
        /// The wire marker byte that introduced the object.
        marker: u8,
    },
}

impl<'a> Object<'a> {
    #[inline]
    pub(crate) const fn new(nodes: &'a [Node], data: &'a [u8], idx: usize) -> Self {
        Self { nodes, data, idx }
    }

    #[inline]
    const fn node(&self) -> Node {
        self.nodes[self.idx]
    }

    /// Byte offset of the object's marker in the input buffer.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.node().offset
    }

    /// Arena range `[idx, end)` covered by this object and its descendants.
    #[inline]
    pub(crate) const fn node_range(&self) -> (usize, usize) {
        (self.idx, subtree_end(self.nodes, self.idx))
    }

    #[inline]
    pub(crate) const fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    #[inline]
    pub(crate) const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Inspect the object.
    #[must_use]
    pub fn kind(&self) -> ObjectKind<'a> {
        match self.node().item {
            Item::Nil => ObjectKind::Nil,
            Item::Bool(b) => ObjectKind::Bool(b),
            Item::Uint(v) => ObjectKind::PositiveInteger(v),
            Item::Int(v) => match u64::try_from(v) {
                Ok(u) => ObjectKind::PositiveInteger(u),
                Err(_) => ObjectKind::NegativeInteger(v),
            },
            Item::F32(v) => ObjectKind::Float32(v),
            Item::F64(v) => ObjectKind::Float64(v),
            Item::Str { start, len } => ObjectKind::Str(&self.data[start..start + len]),
            Item::Bin { start, len } => ObjectKind::Bin(&self.data[start..start + len]),
            Item::Array { len, .. } => ObjectKind::Array(ArrayIter {
                nodes: self.nodes,
                data: self.data,
                next: self.idx + 1,
                remaining: len,
            }),
            Item::Map { len, .. } => ObjectKind::Map(MapIter {
                inner: ArrayIter {
                    nodes: self.nodes,
                    data: self.data,
                    next: self.idx + 1,
                    remaining: len * 2,
                },
            }),
            Item::Ext { marker, start, len } => ObjectKind::Ext {
                type_id: i8::from_be_bytes([self.data[start]]),
                data: &self.data[start + 1..start + 1 + len],
                marker,
            },
        }
    }

    /// Convert the object into an owned [`Value`].
    ///
    /// Integers are range-checked against the profile width. `str` and `bin` both become
    /// [`Value::Bytes`].
    ///
    /// # Errors
    ///
    /// Returns `IntegerOutOfRange` or `UnsupportedType` for the first offending node in wire
    /// order, or an out-of-memory error.
    pub fn to_value(&self, profile: CodecProfile) -> Result<Value, Error> {
        crate::decode::to_value(*self, profile)
    }
}

impl core::fmt::Debug for Object<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Object")
            .field("offset", &self.offset())
            .field("kind", &self.kind())
            .finish()
    }
}

const fn subtree_end(nodes: &[Node], idx: usize) -> usize {
    match nodes[idx].item {
        Item::Array { end, .. } | Item::Map { end, .. } if end > idx => end,
        _ => idx + 1,
    }
}

/// Iterator over the elements of an array object.
#[derive(Debug, Clone, Copy)]
pub struct ArrayIter<'a> {
    nodes: &'a [Node],
    data: &'a [u8],
    next: usize,
    remaining: usize,
}

impl<'a> Iterator for ArrayIter<'a> {
    type Item = Object<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let obj = Object::new(self.nodes, self.data, self.next);
        self.next = subtree_end(self.nodes, self.next);
        Some(obj)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ArrayIter<'_> {}
impl FusedIterator for ArrayIter<'_> {}

/// Iterator over the key/value pairs of a map object, in wire order.
#[derive(Debug, Clone, Copy)]
pub struct MapIter<'a> {
    inner: ArrayIter<'a>,
}

impl<'a> Iterator for MapIter<'a> {
    type Item = (Object<'a>, Object<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.inner.next()?;
        let value = self.inner.next()?;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.inner.remaining / 2;
        (n, Some(n))
    }
}

impl ExactSizeIterator for MapIter<'_> {}
impl FusedIterator for MapIter<'_> {}

#[cfg(test)]
mod tests {
    use crate::parse::{DecodeContext, ParseOutcome};

    use super::*;

    #[test]
    fn walk_nested_object() {
        // {"a": [1, -1], "b": ext(1, [0xaa])}
        let data = [
            0x82, 0xa1, b'a', 0x92, 0x01, 0xff, 0xa1, b'b', 0xd4, 0x01, 0xaa,
        ];
        let mut ctx = DecodeContext::new();
        let ParseOutcome::Success { object, consumed } = ctx.parse_next(&data, 0) else {
            panic!("expected a value");
        };
        assert_eq!(consumed, data.len());

        let ObjectKind::Map(mut entries) = object.kind() else {
            panic!("expected map");
        };
        assert_eq!(entries.len(), 2);

        let (k, v) = entries.next().unwrap();
        assert!(matches!(k.kind(), ObjectKind::Str(b"a")));
        let ObjectKind::Array(items) = v.kind() else {
            panic!("expected array");
        };
        let ints: alloc::vec::Vec<_> = items
            .map(|o| match o.kind() {
                ObjectKind::PositiveInteger(v) => i128::from(v),
                ObjectKind::NegativeInteger(v) => i128::from(v),
                _ => panic!("expected integer"),
            })
            .collect();
        assert_eq!(ints, [1, -1]);

        let (k, v) = entries.next().unwrap();
        assert!(matches!(k.kind(), ObjectKind::Str(b"b")));
        assert_eq!(v.offset(), 8);
        assert!(matches!(
            v.kind(),
            ObjectKind::Ext {
                type_id: 1,
                data: [0xaa],
                marker: 0xd4
            }
        ));
        assert!(entries.next().is_none());
    }
}
