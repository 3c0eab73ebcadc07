//! Point representation used throughout the codec.

use crate::constants::POINT_DIMS;

/// A single point: three unsigned integer coordinates.
///
/// Floating-point attributes reach the codec only after upstream
/// quantization, so every coordinate is a fixed-width unsigned integer
/// by the time it enters the recursive encoder.
pub type Point3 = [u32; POINT_DIMS];

/// Number of bits required to represent `value` (0 for 0).
#[inline]
pub fn bit_width(value: u32) -> u32 {
    32 - value.leading_zeros()
}
