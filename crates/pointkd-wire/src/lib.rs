//! Byte- and bit-level primitives for the pointkd wire format.
//!
//! This crate implements the low-level plumbing the codec builds on: the
//! byte sink/source pair used for header and payload emission, packed
//! bit streams for fixed-width fields, and the adaptive binary range
//! coder behind the highest compression levels.

pub mod bits;
pub mod buffer;
pub mod rangecoder;

pub use bits::{BitReader, BitWriter};
pub use buffer::{DecoderBuffer, EncoderBuffer};
pub use rangecoder::{BitProbability, RangeDecoder, RangeEncoder};
