//! Carry-less adaptive binary range coder.
//!
//! Classic 32-bit range coder with 11-bit adaptive bit probabilities and
//! shift-by-5 adaptation, renormalizing whenever the range drops below
//! 2^24. The encoder and decoder are exact mirrors: both update the same
//! probability state after every bit, so the decoder reconstructs every
//! split of the range from previously decoded information alone. Any
//! divergence between the two sides silently corrupts all later output.

/// Probability precision in bits.
const PROB_BITS: u32 = 11;
/// Initial probability: one half.
const PROB_INIT: u16 = 1 << (PROB_BITS - 1);
/// Adaptation rate shift.
const ADAPT_SHIFT: u16 = 5;
/// Renormalization threshold.
const TOP: u32 = 1 << 24;
/// Bytes the encoder flushes at the end; the decoder primes itself with
/// the same number (one cache byte plus four code bytes).
const FLUSH_BYTES: usize = 5;

/// Adaptive probability of a bit being 0, in 1/2048 units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitProbability(u16);

impl BitProbability {
    pub fn new() -> Self {
        Self(PROB_INIT)
    }

    #[inline]
    fn update(&mut self, bit: u32) {
        if bit == 0 {
            self.0 += ((1u16 << PROB_BITS) - self.0) >> ADAPT_SHIFT;
        } else {
            self.0 -= self.0 >> ADAPT_SHIFT;
        }
    }
}

impl Default for BitProbability {
    fn default() -> Self {
        Self::new()
    }
}

/// Range encoder producing a byte stream decodable by [`RangeDecoder`].
#[derive(Clone, Debug)]
pub struct RangeEncoder {
    low: u64,
    range: u32,
    cache: u8,
    cache_size: u64,
    out: Vec<u8>,
}

impl RangeEncoder {
    pub fn new() -> Self {
        Self {
            low: 0,
            range: u32::MAX,
            cache: 0,
            cache_size: 1,
            out: Vec::new(),
        }
    }

    /// Encode one bit under the given adaptive probability model.
    pub fn encode_bit(&mut self, prob: &mut BitProbability, bit: u32) {
        debug_assert!(bit <= 1);
        let bound = (self.range >> PROB_BITS) * u32::from(prob.0);
        if bit == 0 {
            self.range = bound;
        } else {
            self.low += u64::from(bound);
            self.range -= bound;
        }
        prob.update(bit);
        while self.range < TOP {
            self.shift_low();
            self.range <<= 8;
        }
    }

    fn shift_low(&mut self) {
        if (self.low as u32) < 0xFF00_0000 || (self.low >> 32) != 0 {
            let carry = (self.low >> 32) as u8;
            let mut byte = self.cache;
            loop {
                self.out.push(byte.wrapping_add(carry));
                byte = 0xFF;
                self.cache_size -= 1;
                if self.cache_size == 0 {
                    break;
                }
            }
            self.cache = (self.low >> 24) as u8;
        }
        self.cache_size += 1;
        // 32-bit wrapping shift: bits 24..31 were just captured into the
        // cache byte and must not survive into the next carry check.
        self.low = u64::from((self.low as u32) << 8);
    }

    /// Flush the remaining state and hand back the encoded bytes.
    pub fn finish(&mut self) -> Vec<u8> {
        for _ in 0..FLUSH_BYTES {
            self.shift_low();
        }
        std::mem::take(&mut self.out)
    }
}

impl Default for RangeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Range decoder, the exact mirror of [`RangeEncoder`].
///
/// Reading past the end of the input yields zero bytes rather than an
/// error: the encoder's flush guarantees enough bytes for a well-formed
/// stream, and on a truncated stream the decoded values go out of the
/// valid range, which the caller detects and reports as corruption.
#[derive(Clone, Debug)]
pub struct RangeDecoder<'a> {
    code: u32,
    range: u32,
    data: &'a [u8],
    pos: usize,
}

impl<'a> RangeDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        let mut dec = Self {
            code: 0,
            range: u32::MAX,
            data,
            // Byte 0 is the encoder's initial zero cache byte.
            pos: 1,
        };
        for _ in 0..FLUSH_BYTES - 1 {
            dec.code = (dec.code << 8) | u32::from(dec.next_byte());
        }
        dec
    }

    #[inline]
    fn next_byte(&mut self) -> u8 {
        let byte = self.data.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        byte
    }

    /// Decode one bit under the given adaptive probability model.
    pub fn decode_bit(&mut self, prob: &mut BitProbability) -> u32 {
        let bound = (self.range >> PROB_BITS) * u32::from(prob.0);
        let bit = if self.code < bound {
            self.range = bound;
            0
        } else {
            self.code -= bound;
            self.range -= bound;
            1
        };
        prob.update(bit);
        while self.range < TOP {
            self.range <<= 8;
            self.code = (self.code << 8) | u32::from(self.next_byte());
        }
        bit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn round_trip(bits: &[u32]) {
        let mut model = BitProbability::new();
        let mut enc = RangeEncoder::new();
        for &bit in bits {
            enc.encode_bit(&mut model, bit);
        }
        let bytes = enc.finish();

        let mut model = BitProbability::new();
        let mut dec = RangeDecoder::new(&bytes);
        for (i, &bit) in bits.iter().enumerate() {
            assert_eq!(dec.decode_bit(&mut model), bit, "bit {i}");
        }
    }

    #[test]
    fn empty_stream() {
        let mut enc = RangeEncoder::new();
        let bytes = enc.finish();
        assert_eq!(bytes.len(), FLUSH_BYTES);
    }

    #[test]
    fn short_patterns() {
        round_trip(&[0]);
        round_trip(&[1]);
        round_trip(&[0, 1, 0, 1, 0, 1]);
        round_trip(&[1, 1, 1, 1, 1, 1, 1, 1]);
        round_trip(&[0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn skewed_streams_compress() {
        // Heavily biased input: the adaptive model should beat 1 bit/bit.
        let bits: Vec<u32> = (0..8192).map(|i| u32::from(i % 100 == 0)).collect();
        let mut model = BitProbability::new();
        let mut enc = RangeEncoder::new();
        for &bit in &bits {
            enc.encode_bit(&mut model, bit);
        }
        let bytes = enc.finish();
        assert!(bytes.len() < bits.len() / 8);
        round_trip(&bits);
    }

    #[test]
    fn seeded_random_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..8 {
            let len = rng.gen_range(1..4096);
            let bias = rng.gen_range(0.0..1.0);
            let bits: Vec<u32> = (0..len).map(|_| u32::from(rng.gen_bool(bias))).collect();
            round_trip(&bits);
        }
    }

    #[test]
    fn carry_and_cache_runs_round_trip() {
        // A fresh half-probability model per bit keeps every increment of
        // `low` near half the range, driving shift_low through its carry
        // and cache-run paths; the decoder must track every byte.
        let bits: Vec<u32> = (0..4096).map(|i| u32::from(i % 3 != 0)).collect();

        let mut enc = RangeEncoder::new();
        for &bit in &bits {
            let mut model = BitProbability::new();
            enc.encode_bit(&mut model, bit);
        }
        let bytes = enc.finish();

        let mut dec = RangeDecoder::new(&bytes);
        for (i, &bit) in bits.iter().enumerate() {
            let mut model = BitProbability::new();
            assert_eq!(dec.decode_bit(&mut model), bit, "bit {i}");
        }
    }

    #[test]
    fn multiple_contexts() {
        // Independent models per position, interleaved through one coder.
        let mut models = [BitProbability::new(); 4];
        let bits: Vec<u32> = (0..1024u32).map(|i| (i * 7 + i / 3) & 1).collect();

        let mut enc = RangeEncoder::new();
        for (i, &bit) in bits.iter().enumerate() {
            enc.encode_bit(&mut models[i % 4], bit);
        }
        let bytes = enc.finish();

        let mut models = [BitProbability::new(); 4];
        let mut dec = RangeDecoder::new(&bytes);
        for (i, &bit) in bits.iter().enumerate() {
            assert_eq!(dec.decode_bit(&mut models[i % 4]), bit, "bit {i}");
        }
    }
}
