use core::ops::{Deref, DerefMut};

use crate::decode::to_value;
use crate::parse::{DecodeContext, ParseOutcome};
use crate::profile::CodecProfile;
use crate::value::Value;
use crate::{DecodeLimits, Error, ErrorCode, UnpackError};

/// Summary of a successful [`unpack`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unpacked {
    /// Number of values delivered to the consumer.
    pub values: usize,
    /// Offset of the first byte not consumed. Bytes from here on form an incomplete value.
    pub consumed: usize,
}

/// Releases a caller-owned context on every exit path, unwinding included.
struct Teardown<'c>(&'c mut DecodeContext);

impl Deref for Teardown<'_> {
    type Target = DecodeContext;

    fn deref(&self) -> &DecodeContext {
        self.0
    }
}

impl DerefMut for Teardown<'_> {
    fn deref_mut(&mut self) -> &mut DecodeContext {
        self.0
    }
}

impl Drop for Teardown<'_> {
    fn drop(&mut self) {
        self.0.release();
        #[cfg(feature = "tracing")]
        tracing::trace!("msgpack decode context released");
    }
}

/// Streaming decoder delivering every complete value of a buffer to a consumer.
///
/// Concatenated values are decoded in order; each one is converted and handed to the consumer
/// before the next one is parsed. An incomplete value at the end of the buffer ends the call
/// without error, and [`Unpacked::consumed`] tells the caller where it starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamDecoder {
    profile: CodecProfile,
    limits: DecodeLimits,
}

impl StreamDecoder {
    /// Decoder with the default profile and [`DecodeLimits::UNBOUNDED`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            profile: CodecProfile::DEFAULT,
            limits: DecodeLimits::UNBOUNDED,
        }
    }

    /// Set the numeric profile used for range checks.
    #[must_use]
    pub const fn with_profile(mut self, profile: CodecProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set the decode limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The numeric profile.
    #[must_use]
    pub const fn profile(&self) -> CodecProfile {
        self.profile
    }

    /// The decode limits.
    #[must_use]
    pub const fn limits(&self) -> DecodeLimits {
        self.limits
    }

    /// Decode `bytes` with a context created for this call.
    ///
    /// # Errors
    ///
    /// - `UnpackError::Codec` with `MissingConsumer` if `consumer` is `None`. No byte is inspected
    ///   and no context is created.
    /// - `UnpackError::Codec` for malformed data, a limit violation, an out-of-range integer, or
    ///   an unsupported wire type.
    /// - `UnpackError::Fatal` if memory runs out.
    /// - `UnpackError::Consumer` with the consumer's own error. Values after the failing one are
    ///   not decoded.
    pub fn unpack<F, E>(&self, bytes: &[u8], consumer: Option<F>) -> Result<Unpacked, UnpackError<E>>
    where
        F: FnMut(Value) -> Result<(), E>,
    {
        let consumer = consumer.ok_or_else(missing_consumer)?;
        let mut ctx = DecodeContext::with_limits(self.limits);
        let result = self.drive(&mut ctx, bytes, consumer);
        ctx.destroy();
        result
    }

    /// Decode `bytes` with a caller-owned context.
    ///
    /// The context's own limits apply. It is reset before the first parse attempt and released
    /// when the call returns or unwinds, so it can be reused for the next call.
    ///
    /// # Errors
    ///
    /// See [`StreamDecoder::unpack`].
    pub fn unpack_in<F, E>(
        &self,
        ctx: &mut DecodeContext,
        bytes: &[u8],
        consumer: Option<F>,
    ) -> Result<Unpacked, UnpackError<E>>
    where
        F: FnMut(Value) -> Result<(), E>,
    {
        let consumer = consumer.ok_or_else(missing_consumer)?;
        let mut ctx = Teardown(ctx);
        ctx.reset();
        self.drive(&mut ctx, bytes, consumer)
    }

    fn drive<F, E>(
        &self,
        ctx: &mut DecodeContext,
        bytes: &[u8],
        mut consumer: F,
    ) -> Result<Unpacked, UnpackError<E>>
    where
        F: FnMut(Value) -> Result<(), E>,
    {
        let mut offset = 0usize;
        let mut values = 0usize;
        loop {
            let (value, consumed) = match ctx.parse_next(bytes, offset) {
                ParseOutcome::Success { object, consumed } => {
                    let value = to_value(object, self.profile).map_err(UnpackError::from_codec)?;
                    (value, consumed)
                }
                ParseOutcome::Incomplete => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(
                        offset,
                        pending = bytes.len() - offset,
                        "msgpack unpack stopped at incomplete value"
                    );
                    break;
                }
                ParseOutcome::ParseError(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(offset = err.offset, %err, "msgpack parse failed");
                    return Err(UnpackError::Codec(err));
                }
                ParseOutcome::OutOfMemory(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(offset = err.offset, "msgpack decode ran out of memory");
                    return Err(UnpackError::Fatal(err));
                }
            };
            consumer(value).map_err(UnpackError::Consumer)?;
            offset += consumed;
            values += 1;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(values, consumed = offset, "msgpack unpack finished");
        Ok(Unpacked {
            values,
            consumed: offset,
        })
    }
}

fn missing_consumer<E>() -> UnpackError<E> {
    UnpackError::Codec(Error::new(ErrorCode::MissingConsumer, 0))
}

/// Decode every complete value of `bytes` with the default profile, delivering each to
/// `consumer` in order.
///
/// # Errors
///
/// See [`StreamDecoder::unpack`].
pub fn unpack<F, E>(bytes: &[u8], consumer: Option<F>) -> Result<Unpacked, UnpackError<E>>
where
    F: FnMut(Value) -> Result<(), E>,
{
    StreamDecoder::new().unpack(bytes, consumer)
}
