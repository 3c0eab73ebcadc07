//! Split-count coding strategies.
//!
//! Every tree node stores one value: how many of its points fall in the
//! lower half (the other half is implied by the subset size). The
//! compression level selects which of a closed set of strategies codes
//! that value; the level travels in the stream header, so encoder and
//! decoder pick the same variant by level value alone.
//!
//! | levels | strategy | trade-off |
//! |--------|----------|-----------|
//! | 0..=4  | direct: fixed `bit_width(max)` bits | fastest, largest |
//! | 5..=7  | centered: gamma-coded distance from `max/2` | cheap wins on balanced splits |
//! | 8..=10 | adaptive: range-coded bits, one model per bit position | slowest, smallest |

use pointkd_types::{bit_width, CompressionLevel, PointKdError, Result};
use pointkd_wire::{BitProbability, BitReader, BitWriter, RangeDecoder, RangeEncoder};

/// Highest number of count bits any strategy codes (counts are u32).
const MAX_COUNT_BITS: usize = 32;

/// Encoder side of a count-coding strategy.
///
/// `encode` may be called any number of times; `finish` seals the stream
/// and returns its bytes.
pub trait CountEncoding {
    /// Encode `count`, known by both sides to lie in `0..=max`.
    fn encode(&mut self, count: u32, max: u32);

    /// Seal the stream and return the encoded bytes.
    fn finish(&mut self) -> Vec<u8>;
}

/// Decoder side of a count-coding strategy.
pub trait CountDecoding {
    /// Decode the next count, validated against `0..=max`.
    fn decode(&mut self, max: u32) -> Result<u32>;
}

/// Select the encoder variant for `level`.
pub fn count_encoder(level: CompressionLevel) -> Box<dyn CountEncoding> {
    match level.get() {
        0..=4 => Box::new(DirectCountEncoder::new()),
        5..=7 => Box::new(CenteredCountEncoder::new()),
        _ => Box::new(AdaptiveCountEncoder::new()),
    }
}

/// Select the decoder variant for `level` over the sealed count stream.
pub fn count_decoder(level: CompressionLevel, bytes: &[u8]) -> Box<dyn CountDecoding + '_> {
    match level.get() {
        0..=4 => Box::new(DirectCountDecoder::new(bytes)),
        5..=7 => Box::new(CenteredCountDecoder::new(bytes)),
        _ => Box::new(AdaptiveCountDecoder::new(bytes)),
    }
}

// ---------------------------------------------------------------------------
// Direct: fixed-width binary
// ---------------------------------------------------------------------------

struct DirectCountEncoder {
    bits: BitWriter,
}

impl DirectCountEncoder {
    fn new() -> Self {
        Self {
            bits: BitWriter::new(),
        }
    }
}

impl CountEncoding for DirectCountEncoder {
    fn encode(&mut self, count: u32, max: u32) {
        debug_assert!(count <= max);
        self.bits.write_bits(count, bit_width(max));
    }

    fn finish(&mut self) -> Vec<u8> {
        self.bits.finish()
    }
}

struct DirectCountDecoder<'a> {
    bits: BitReader<'a>,
}

impl<'a> DirectCountDecoder<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bits: BitReader::new(bytes),
        }
    }
}

impl CountDecoding for DirectCountDecoder<'_> {
    fn decode(&mut self, max: u32) -> Result<u32> {
        let count = self.bits.read_bits(bit_width(max))?;
        if count > max {
            return Err(PointKdError::CorruptStream("split count exceeds subset size"));
        }
        Ok(count)
    }
}

// ---------------------------------------------------------------------------
// Centered: Elias-gamma distance from the midpoint
// ---------------------------------------------------------------------------
//
// Spatial splits of real point clouds cluster around the midpoint, so the
// zigzag-folded distance from `max/2` is usually small and gamma coding
// beats the fixed width.

struct CenteredCountEncoder {
    bits: BitWriter,
}

impl CenteredCountEncoder {
    fn new() -> Self {
        Self {
            bits: BitWriter::new(),
        }
    }
}

impl CountEncoding for CenteredCountEncoder {
    fn encode(&mut self, count: u32, max: u32) {
        debug_assert!(count <= max);
        let delta = i64::from(count) - i64::from(max / 2);
        let folded = ((delta << 1) ^ (delta >> 63)) as u64;
        write_gamma(&mut self.bits, folded + 1);
    }

    fn finish(&mut self) -> Vec<u8> {
        self.bits.finish()
    }
}

struct CenteredCountDecoder<'a> {
    bits: BitReader<'a>,
}

impl<'a> CenteredCountDecoder<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bits: BitReader::new(bytes),
        }
    }
}

impl CountDecoding for CenteredCountDecoder<'_> {
    fn decode(&mut self, max: u32) -> Result<u32> {
        let folded = read_gamma(&mut self.bits)? - 1;
        let delta = (folded >> 1) as i64 ^ -((folded & 1) as i64);
        let count = i64::from(max / 2) + delta;
        if count < 0 || count > i64::from(max) {
            return Err(PointKdError::CorruptStream("split count exceeds subset size"));
        }
        Ok(count as u32)
    }
}

/// Elias-gamma code for `value >= 1`: `n-1` zero bits, then the `n`
/// significant bits of the value, most significant (always 1) first.
fn write_gamma(bits: &mut BitWriter, value: u64) {
    debug_assert!(value >= 1);
    let len = 64 - value.leading_zeros();
    for _ in 1..len {
        bits.write_bits(0, 1);
    }
    bits.write_bits(1, 1);
    for i in (0..len - 1).rev() {
        bits.write_bits(((value >> i) & 1) as u32, 1);
    }
}

fn read_gamma(bits: &mut BitReader<'_>) -> Result<u64> {
    let mut zeros = 0u32;
    while bits.read_bits(1)? == 0 {
        zeros += 1;
        if zeros >= 64 {
            return Err(PointKdError::CorruptStream("gamma code prefix overlong"));
        }
    }
    let mut value = 1u64;
    for _ in 0..zeros {
        value = (value << 1) | u64::from(bits.read_bits(1)?);
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Adaptive: range-coded bits with per-position models
// ---------------------------------------------------------------------------

struct AdaptiveCountEncoder {
    coder: RangeEncoder,
    models: [BitProbability; MAX_COUNT_BITS],
}

impl AdaptiveCountEncoder {
    fn new() -> Self {
        Self {
            coder: RangeEncoder::new(),
            models: [BitProbability::new(); MAX_COUNT_BITS],
        }
    }
}

impl CountEncoding for AdaptiveCountEncoder {
    fn encode(&mut self, count: u32, max: u32) {
        debug_assert!(count <= max);
        for i in (0..bit_width(max)).rev() {
            let bit = (count >> i) & 1;
            self.coder.encode_bit(&mut self.models[i as usize], bit);
        }
    }

    fn finish(&mut self) -> Vec<u8> {
        self.coder.finish()
    }
}

struct AdaptiveCountDecoder<'a> {
    coder: RangeDecoder<'a>,
    models: [BitProbability; MAX_COUNT_BITS],
}

impl<'a> AdaptiveCountDecoder<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            coder: RangeDecoder::new(bytes),
            models: [BitProbability::new(); MAX_COUNT_BITS],
        }
    }
}

impl CountDecoding for AdaptiveCountDecoder<'_> {
    fn decode(&mut self, max: u32) -> Result<u32> {
        let mut count = 0u32;
        for i in (0..bit_width(max)).rev() {
            count = (count << 1) | self.coder.decode_bit(&mut self.models[i as usize]);
        }
        if count > max {
            return Err(PointKdError::CorruptStream("split count exceeds subset size"));
        }
        Ok(count)
    }
}
