//! Packed bit streams for fixed-width fields.
//!
//! Values are packed low-bit-first into bytes. A field of `n` bits always
//! occupies exactly `n` consecutive bits, so the reader recovers fields by
//! width alone; no alignment or padding exists between fields. The final
//! partial byte is zero-padded on `finish`.

use pointkd_types::{PointKdError, Result};

/// Append-only bit stream writer.
#[derive(Clone, Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    acc: u64,
    pending: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low `width` bits of `value`. `width` may be 0..=32;
    /// a zero width appends nothing.
    pub fn write_bits(&mut self, value: u32, width: u32) {
        debug_assert!(width <= 32);
        debug_assert!(width == 32 || u64::from(value) < (1u64 << width));
        self.acc |= u64::from(value) << self.pending;
        self.pending += width;
        while self.pending >= 8 {
            self.bytes.push((self.acc & 0xFF) as u8);
            self.acc >>= 8;
            self.pending -= 8;
        }
    }

    /// Flush the partial byte (zero-padded) and hand back the stream.
    pub fn finish(&mut self) -> Vec<u8> {
        if self.pending > 0 {
            self.bytes.push((self.acc & 0xFF) as u8);
            self.acc = 0;
            self.pending = 0;
        }
        std::mem::take(&mut self.bytes)
    }

    /// Bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.pending as usize
    }
}

/// Sequential bit stream reader, symmetric to [`BitWriter`].
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    acc: u64,
    pending: u32,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            acc: 0,
            pending: 0,
        }
    }

    /// Read a `width`-bit field. A zero width reads nothing and returns 0.
    ///
    /// # Errors
    ///
    /// Returns a corrupt-stream error if the stream holds fewer than
    /// `width` unread bits.
    pub fn read_bits(&mut self, width: u32) -> Result<u32> {
        debug_assert!(width <= 32);
        while self.pending < width {
            let byte = *self
                .bytes
                .get(self.pos)
                .ok_or(PointKdError::CorruptStream("bit stream exhausted"))?;
            self.acc |= u64::from(byte) << self.pending;
            self.pending += 8;
            self.pos += 1;
        }
        let mask = if width == 32 {
            u64::from(u32::MAX)
        } else {
            (1u64 << width) - 1
        };
        let value = (self.acc & mask) as u32;
        self.acc >>= width;
        self.pending -= width;
        Ok(value)
    }
}
