/// Default maximum nesting depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default maximum container length limit for arrays/maps.
///
/// This is a safety limit; adjust explicitly for your deployment.
pub const DEFAULT_MAX_CONTAINER_LEN: usize = 1 << 20;

/// Decode-time resource limits.
///
/// A violated limit is a [`crate::ErrorKind::Malformed`] error at the offending header, never an
/// incomplete-input condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum encoded length of one value in bytes. A stream may hold any number of them.
    pub max_input_bytes: usize,
    /// Maximum nesting depth. The top-level container counts as depth 1.
    pub max_depth: usize,
    /// Maximum array length.
    pub max_array_len: usize,
    /// Maximum map length (pairs).
    pub max_map_len: usize,
    /// Maximum string/binary/extension payload length in bytes.
    pub max_bytes_len: usize,
}

impl DecodeLimits {
    /// Limits that only bound nesting depth; every length is unbounded.
    pub const UNBOUNDED: Self = Self {
        max_input_bytes: usize::MAX,
        max_depth: DEFAULT_MAX_DEPTH,
        max_array_len: usize::MAX,
        max_map_len: usize::MAX,
        max_bytes_len: usize::MAX,
    };

    /// Construct conservative limits derived from a maximum message size.
    ///
    /// The defaults are:
    /// - `max_input_bytes = max_message_bytes` (per value)
    /// - `max_bytes_len = max_message_bytes`
    /// - `max_array_len` and `max_map_len` are capped by `DEFAULT_MAX_CONTAINER_LEN`
    #[must_use]
    pub fn for_bytes(max_message_bytes: usize) -> Self {
        let max_container_len = max_message_bytes.min(DEFAULT_MAX_CONTAINER_LEN);
        Self {
            max_input_bytes: max_message_bytes,
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_len: max_container_len,
            max_map_len: max_container_len,
            max_bytes_len: max_message_bytes,
        }
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}
