use core::fmt;

/// The high-level class of an error.
///
/// The codec distinguishes recoverable failures (everything except [`ErrorKind::OutOfMemory`])
/// from the fatal allocation-failure condition. Callers branch on the kind; the [`ErrorCode`]
/// narrows down the exact reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required argument was missing (e.g. `unpack` without a consumer).
    Argument,
    /// An integer does not fit the configured integer width.
    Range,
    /// A decoded wire object carries a type the value model does not support.
    UnsupportedType,
    /// The input is not a valid MessagePack encoding, or violates decode limits.
    Malformed,
    /// Memory allocation failed. This is the only fatal kind.
    OutOfMemory,
    /// Converting a host value into a [`crate::Value`] failed.
    Coercion,
}

/// A structured error code identifying the reason an operation failed.
///
/// This enum is stable and string-free so it stays usable under `no_std`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// `unpack` was called without a consumer.
    MissingConsumer,

    /// A decoded integer lies outside the configured width.
    IntegerOutOfRange,

    /// A wire type with the given marker byte cannot be converted (extension types).
    UnsupportedType(u8),

    /// Unexpected end of input while decoding a single value.
    UnexpectedEof,
    /// Input contains bytes after the single decoded value.
    TrailingBytes,
    /// The reserved marker byte `0xc1` was encountered.
    ReservedMarker,
    /// Arithmetic overflow while computing a length or offset.
    LengthOverflow,
    /// Input length exceeds decode limits.
    MessageLenLimitExceeded,
    /// Nesting depth limit exceeded.
    DepthLimitExceeded,
    /// Array length exceeds decode limits.
    ArrayLenLimitExceeded,
    /// Map length exceeds decode limits.
    MapLenLimitExceeded,
    /// String or binary payload length exceeds decode limits.
    BytesLenLimitExceeded,

    /// Memory allocation failed.
    AllocationFailed,

    /// A host value has no MessagePack representation (e.g. `u64` above `i64::MAX`).
    NotRepresentable,
    /// A host string could not be converted to bytes.
    InvalidText,
}

impl ErrorCode {
    /// The error kind this code belongs to.
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::MissingConsumer => ErrorKind::Argument,
            Self::IntegerOutOfRange => ErrorKind::Range,
            Self::UnsupportedType(_) => ErrorKind::UnsupportedType,
            Self::UnexpectedEof
            | Self::TrailingBytes
            | Self::ReservedMarker
            | Self::LengthOverflow
            | Self::MessageLenLimitExceeded
            | Self::DepthLimitExceeded
            | Self::ArrayLenLimitExceeded
            | Self::MapLenLimitExceeded
            | Self::BytesLenLimitExceeded => ErrorKind::Malformed,
            Self::AllocationFailed => ErrorKind::OutOfMemory,
            Self::NotRepresentable | Self::InvalidText => ErrorKind::Coercion,
        }
    }
}

/// A codec error with a stable code and a byte offset.
///
/// Offsets point into the decoder input for decode errors and into the output buffer for encode
/// errors. Argument and coercion errors carry offset `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Error {
    /// The error code.
    pub code: ErrorCode,
    /// Byte offset where the error was detected.
    pub offset: usize,
}

impl Error {
    /// Construct an error at `offset`.
    #[inline]
    #[must_use]
    pub const fn new(code: ErrorCode, offset: usize) -> Self {
        Self { code, offset }
    }

    /// Construct a coercion failure (offset `0`).
    #[inline]
    #[must_use]
    pub const fn coercion(code: ErrorCode) -> Self {
        Self { code, offset: 0 }
    }

    /// The error kind.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        self.code.kind()
    }

    /// Returns true iff this error is the fatal out-of-memory condition.
    #[inline]
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(self.code.kind(), ErrorKind::OutOfMemory)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.code {
            ErrorCode::MissingConsumer => "no consumer given",

            ErrorCode::IntegerOutOfRange => "integer out of configured range",

            ErrorCode::UnsupportedType(marker) => {
                return write!(
                    f,
                    "msgpack unpack failed at {}: cannot unpack type 0x{marker:02x}",
                    self.offset
                );
            }

            ErrorCode::UnexpectedEof => "unexpected end of input",
            ErrorCode::TrailingBytes => "trailing bytes after single value",
            ErrorCode::ReservedMarker => "reserved marker 0xc1",
            ErrorCode::LengthOverflow => "length overflow",
            ErrorCode::MessageLenLimitExceeded => "input length exceeds decode limits",
            ErrorCode::DepthLimitExceeded => "nesting depth limit exceeded",
            ErrorCode::ArrayLenLimitExceeded => "array length exceeds decode limits",
            ErrorCode::MapLenLimitExceeded => "map length exceeds decode limits",
            ErrorCode::BytesLenLimitExceeded => "string/binary length exceeds decode limits",

            ErrorCode::AllocationFailed => "allocation failed",

            ErrorCode::NotRepresentable => "value has no msgpack representation",
            ErrorCode::InvalidText => "value cannot be converted to bytes",
        };

        match self.kind() {
            ErrorKind::Argument => write!(f, "argument error: {msg}"),
            ErrorKind::Coercion => write!(f, "msgpack coercion failed: {msg}"),
            ErrorKind::OutOfMemory => write!(f, "out of memory at {}: {msg}", self.offset),
            _ => write!(f, "msgpack error at {}: {msg}", self.offset),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Failure of a streaming `unpack` call.
///
/// Recoverable codec errors, the fatal out-of-memory condition, and errors raised by the
/// consumer travel through separate variants so callers never confuse them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnpackError<E> {
    /// A recoverable codec error (argument, range, unsupported type, malformed data).
    Codec(Error),
    /// Allocation failed while parsing.
    Fatal(Error),
    /// The consumer returned an error; it is passed through unchanged.
    Consumer(E),
}

impl<E> UnpackError<E> {
    /// Route a codec error to the recoverable or fatal channel.
    #[inline]
    #[must_use]
    pub const fn from_codec(err: Error) -> Self {
        if err.is_fatal() {
            Self::Fatal(err)
        } else {
            Self::Codec(err)
        }
    }

    /// The codec error, if this is not a consumer error.
    #[must_use]
    pub const fn codec_error(&self) -> Option<Error> {
        match self {
            Self::Codec(err) | Self::Fatal(err) => Some(*err),
            Self::Consumer(_) => None,
        }
    }

    /// The codec error kind, if this is not a consumer error.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self.codec_error() {
            Some(err) => Some(err.kind()),
            None => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for UnpackError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(err) => write!(f, "{err}"),
            Self::Fatal(err) => write!(f, "fatal: {err}"),
            Self::Consumer(err) => write!(f, "consumer failed: {err}"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug + fmt::Display> std::error::Error for UnpackError<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_memory_routes_to_fatal_channel() {
        let err = Error::new(ErrorCode::AllocationFailed, 7);
        assert!(err.is_fatal());
        assert!(matches!(
            UnpackError::<()>::from_codec(err),
            UnpackError::Fatal(_)
        ));

        let err = Error::new(ErrorCode::ReservedMarker, 0);
        assert!(!err.is_fatal());
        assert!(matches!(
            UnpackError::<()>::from_codec(err),
            UnpackError::Codec(_)
        ));
    }

    #[test]
    fn unsupported_type_names_marker() {
        let err = Error::new(ErrorCode::UnsupportedType(0xd4), 3);
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        let msg = alloc::format!("{err}");
        assert!(msg.contains("0xd4"), "{msg}");
    }
}
