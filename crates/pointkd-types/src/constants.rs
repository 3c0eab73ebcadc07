//! Wire-level constants shared by the encoder and decoder.

/// Number of coordinate components every point carries.
pub const POINT_DIMS: usize = 3;

/// Byte length of the fixed stream header: method id (1) +
/// compression level (1) + point count (4, little-endian).
pub const STREAM_HEADER_SIZE: usize = 6;

/// Highest valid compression level.
pub const MAX_COMPRESSION_LEVEL: u8 = 10;

/// Maximum per-axis coordinate bit depth the codec supports.
pub const MAX_BIT_LENGTH: u8 = 32;
