//! Encoder configuration and the compression level derived from it.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_COMPRESSION_LEVEL;
use crate::error::{PointKdError, Result};

/// Caller-supplied configuration for one encoder instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderOptions {
    /// Effort knob, 0 (slowest, best ratio) to 10 (fastest). The wire
    /// compression level is derived as `10 - encoding_speed`.
    pub encoding_speed: u8,
    /// Bits per coordinate used by the upstream quantizer. Required for
    /// float attributes; ignored for integer attributes.
    pub quantization_bits: Option<u8>,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            encoding_speed: 5,
            quantization_bits: None,
        }
    }
}

/// Validated compression level in the closed range 0..=10.
///
/// Each level maps to exactly one strategy variant; encoder and decoder
/// agree on the variant by this value alone, carried verbatim in the
/// stream header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// Validate a raw level value.
    pub fn new(level: u8) -> Result<Self> {
        if level > MAX_COMPRESSION_LEVEL {
            return Err(PointKdError::InvalidCompressionLevel(level));
        }
        Ok(Self(level))
    }

    /// Derive the level from the encoding-speed knob: `level = 10 - speed`.
    pub fn from_speed(speed: u8) -> Result<Self> {
        match MAX_COMPRESSION_LEVEL.checked_sub(speed) {
            Some(level) => Ok(Self(level)),
            None => Err(PointKdError::InvalidEncodingSpeed(speed)),
        }
    }

    /// The raw level value, as written to the stream header.
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for CompressionLevel {
    type Error = PointKdError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_accepts_full_range() {
        for level in 0..=10 {
            assert_eq!(CompressionLevel::new(level).unwrap().get(), level);
        }
    }

    #[test]
    fn level_rejects_out_of_range() {
        assert_eq!(
            CompressionLevel::new(11),
            Err(PointKdError::InvalidCompressionLevel(11))
        );
        assert_eq!(
            CompressionLevel::new(255),
            Err(PointKdError::InvalidCompressionLevel(255))
        );
    }

    #[test]
    fn level_from_speed_is_inverted() {
        assert_eq!(CompressionLevel::from_speed(0).unwrap().get(), 10);
        assert_eq!(CompressionLevel::from_speed(10).unwrap().get(), 0);
        assert_eq!(CompressionLevel::from_speed(3).unwrap().get(), 7);
    }

    #[test]
    fn speed_out_of_range_rejected() {
        assert_eq!(
            CompressionLevel::from_speed(11),
            Err(PointKdError::InvalidEncodingSpeed(11))
        );
    }
}
