#[cfg(feature = "simdutf8")]
use simdutf8::basic as simd_utf8;

/// Returns `true` iff `bytes` is strictly valid UTF-8.
///
/// Overlong encodings, surrogate code points (U+D800..=U+DFFF), code points above U+10FFFF and
/// truncated multi-byte sequences are all rejected. The encoder uses this to choose between the
/// `str` and `bin` wire families.
#[inline]
#[must_use]
pub fn is_valid_utf8(bytes: &[u8]) -> bool {
    as_utf8(bytes).is_some()
}

/// Borrow `bytes` as `&str` when they are valid UTF-8.
#[inline]
pub(crate) fn as_utf8(bytes: &[u8]) -> Option<&str> {
    #[cfg(feature = "simdutf8")]
    {
        simd_utf8::from_utf8(bytes).ok()
    }

    #[cfg(not(feature = "simdutf8"))]
    {
        core::str::from_utf8(bytes).ok()
    }
}
