//! Numeric profile of the codec.
//!
//! The integer width and float precision are fixed per codec instance, mirroring a build-time
//! configuration of the host's numeric types:
//!
//! - Integers are always written with the **fixed-width** signed tag of the configured width
//!   (`int16`, `int32` or `int64`), regardless of magnitude. This differs from the
//!   minimal-width encoding canonical MessagePack writers use.
//! - Floats are always written as `float32` or `float64` according to the configured precision.
//! - On decode, any integer wire form is accepted as long as the value fits the configured width.

/// Signed integer width of the value model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntWidth {
    /// 16-bit integers, written as `int16` (`0xd1`).
    W16,
    /// 32-bit integers, written as `int32` (`0xd2`).
    W32,
    /// 64-bit integers, written as `int64` (`0xd3`).
    #[default]
    W64,
}

impl IntWidth {
    /// Largest representable integer.
    #[must_use]
    pub const fn max(self) -> i64 {
        match self {
            Self::W16 => i16::MAX as i64,
            Self::W32 => i32::MAX as i64,
            Self::W64 => i64::MAX,
        }
    }

    /// Smallest representable integer.
    #[must_use]
    pub const fn min(self) -> i64 {
        match self {
            Self::W16 => i16::MIN as i64,
            Self::W32 => i32::MIN as i64,
            Self::W64 => i64::MIN,
        }
    }

    /// Returns `true` iff `v` fits this width.
    #[inline]
    #[must_use]
    pub const fn contains(self, v: i64) -> bool {
        v >= self.min() && v <= self.max()
    }

    /// Returns `true` iff the unsigned wire value `v` fits this width.
    #[inline]
    #[must_use]
    pub const fn contains_unsigned(self, v: u64) -> bool {
        // max() is non-negative for every width.
        v <= self.max() as u64
    }
}

/// Floating point precision of the value model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FloatWidth {
    /// Single precision, written as `float32` (`0xca`).
    F32,
    /// Double precision, written as `float64` (`0xcb`).
    #[default]
    F64,
}

/// Numeric configuration shared by the encoder and the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CodecProfile {
    /// Integer width.
    pub int_width: IntWidth,
    /// Float precision.
    pub float_width: FloatWidth,
}

impl CodecProfile {
    /// 64-bit integers and double precision floats.
    pub const DEFAULT: Self = Self {
        int_width: IntWidth::W64,
        float_width: FloatWidth::F64,
    };

    /// Construct a profile.
    #[must_use]
    pub const fn new(int_width: IntWidth, float_width: FloatWidth) -> Self {
        Self {
            int_width,
            float_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_bounds() {
        assert!(IntWidth::W16.contains(i64::from(i16::MAX)));
        assert!(!IntWidth::W16.contains(i64::from(i16::MAX) + 1));
        assert!(IntWidth::W16.contains(i64::from(i16::MIN)));
        assert!(!IntWidth::W16.contains(i64::from(i16::MIN) - 1));
        assert!(IntWidth::W32.contains_unsigned(2_147_483_647));
        assert!(!IntWidth::W32.contains_unsigned(2_147_483_648));
        assert!(IntWidth::W64.contains_unsigned(i64::MAX as u64));
        assert!(!IntWidth::W64.contains_unsigned(i64::MAX as u64 + 1));
    }

    #[test]
    fn default_profile_is_widest() {
        assert_eq!(CodecProfile::default(), CodecProfile::DEFAULT);
    }
}
