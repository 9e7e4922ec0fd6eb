//! # msgpack-codec
//!
//! A MessagePack codec between a dynamic value model ([`Value`]) and the binary wire format:
//!
//! - a recursive **encoder** ([`pack`], [`Encoder`]) that serializes a value tree into bytes, and
//! - a **streaming decoder** ([`unpack`], [`StreamDecoder`]) that pulls every complete value out of
//!   a buffer of concatenated encodings and hands each one to a consumer as soon as it is parsed.
//!
//! ## Numeric policy
//!
//! The integer width and float precision come from a [`CodecProfile`]:
//!
//! - Integers are always written with the fixed-width signed tag of the profile (`int16`,
//!   `int32` or `int64`), whatever their magnitude. An integer outside the width is a
//!   [`ErrorKind::Range`] error.
//! - Floats are always written as `float32` or `float64` according to the profile.
//! - The decoder accepts every integer wire form and range-checks the value against the profile.
//!
//! ## Strings
//!
//! [`Value::Bytes`] is written as `str` when its payload is strictly valid UTF-8
//! ([`is_valid_utf8`]) and as `bin` otherwise. Both wire families decode back to
//! [`Value::Bytes`]. The lower-level [`Object`] view still tells them apart.
//!
//! ## Streaming
//!
//! ```
//! use msgpack_codec::{pack, unpack, Value};
//!
//! let mut buf = pack(&Value::text("hallo")).unwrap();
//! buf.extend(pack(&Value::Int(7)).unwrap());
//! buf.push(0x92); // start of an array that has not arrived yet
//!
//! let mut seen = Vec::new();
//! let out = unpack(&buf, Some(|v: Value| {
//!     seen.push(v);
//!     Ok::<(), ()>(())
//! }))
//! .unwrap();
//! assert_eq!(seen, [Value::text("hallo"), Value::Int(7)]);
//! assert_eq!(out.consumed, buf.len() - 1);
//! ```
//!
//! An incomplete value at the end of the buffer is not an error: the call stops and
//! [`Unpacked::consumed`] marks where the pending bytes begin.
//!
//! ## Errors
//!
//! Failures are values. [`Error`] carries an [`ErrorCode`] and a byte offset; [`ErrorKind`]
//! separates argument, range, unsupported-type, malformed-data and coercion failures from the
//! fatal out-of-memory condition. [`UnpackError`] keeps consumer errors apart from codec errors.
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error`, enables `HashMap` and path coercions.
//! - `sha2`: enables `PackedBytes::sha256`.
//! - `serde`: `Serialize`/`Deserialize` for [`Value`] and `to_value`/`to_vec` for any
//!   `Serialize` type.
//! - `simdutf8`: SIMD-accelerated UTF-8 classification where supported.
//! - `tracing`: `tracing` events from the streaming decoder.
//!
//! ## `no_std`
//!
//! Without `std` the crate needs only `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

extern crate alloc;

mod alloc_util;
mod codec;
mod decode;
mod encode;
mod error;
mod limits;
mod macros;
mod object;
mod packed;
mod parse;
mod profile;
#[cfg(feature = "serde")]
mod serde_impl;
mod stream;
mod utf8;
mod value;
mod wire;

pub use crate::codec::{ArrayElem, IntoValue, MapEntries};
pub use crate::decode::{decode, decode_all, decode_with};
pub use crate::encode::{pack, pack_any, pack_with, Encoder};
pub use crate::error::{Error, ErrorCode, ErrorKind, UnpackError};
pub use crate::limits::{DecodeLimits, DEFAULT_MAX_CONTAINER_LEN, DEFAULT_MAX_DEPTH};
pub use crate::object::{ArrayIter, MapIter, Object, ObjectKind};
pub use crate::packed::PackedBytes;
pub use crate::parse::{DecodeContext, ParseOutcome};
pub use crate::profile::{CodecProfile, FloatWidth, IntWidth};
pub use crate::stream::{unpack, StreamDecoder, Unpacked};
pub use crate::utf8::is_valid_utf8;
pub use crate::value::{Value, ValueKind};

#[doc(hidden)]
pub use crate::macros::__msgpack_macro;

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub use crate::serde_impl::{to_value, to_vec};

pub use msgpack_codec_derive::IntoValue;
