use alloc::vec::Vec;
use core::ops::Deref;

use crate::value::Value;
use crate::Error;

/// Owned MessagePack bytes produced by the encoder.
///
/// Useful for storing or transmitting an encoded value and, with the `sha2` feature, for
/// fingerprinting it. The bytes are whatever the encoder wrote; they are not re-validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PackedBytes {
    bytes: Vec<u8>,
}

impl PackedBytes {
    #[inline]
    pub(crate) const fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Borrow the encoded bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume and return the encoded bytes.
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` iff nothing was encoded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the bytes back into exactly one [`Value`] with the default profile.
    ///
    /// # Errors
    ///
    /// See [`crate::decode`].
    pub fn to_value(&self) -> Result<Value, Error> {
        crate::decode::decode(&self.bytes)
    }

    /// Compute the SHA-256 digest of the encoded bytes.
    #[cfg(feature = "sha2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "sha2")))]
    #[must_use]
    pub fn sha256(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};
        let mut h = Sha256::new();
        h.update(&self.bytes);
        let out = h.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(out.as_slice());
        digest
    }
}

impl AsRef<[u8]> for PackedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Deref for PackedBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<PackedBytes> for Vec<u8> {
    fn from(p: PackedBytes) -> Self {
        p.bytes
    }
}
