//! Byte sink and byte source used for header and payload emission.
//!
//! All multi-byte values are little-endian. The source reports underruns
//! as corrupt-stream errors; the sink is infallible.

use pointkd_types::{PointKdError, Result};

/// Growable byte sink the encoder appends header and payload bytes to.
#[derive(Clone, Debug, Default)]
pub struct EncoderBuffer {
    data: Vec<u8>,
}

impl EncoderBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn put_u8(&mut self, value: u8) {
        self.data.push(value);
    }

    #[inline]
    pub fn put_u32_le(&mut self, value: u32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

/// Positioned byte source the decoder consumes sequentially.
#[derive(Clone, Debug)]
pub struct DecoderBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DecoderBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes left to consume.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn take_u8(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(PointKdError::CorruptStream("unexpected end of input"))?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn take_u32_le(&mut self) -> Result<u32> {
        let bytes = self.take_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Consume exactly `count` bytes and return them as a slice.
    pub fn take_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(PointKdError::CorruptStream("unexpected end of input"));
        }
        let slice = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    /// Consume everything left in the source.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }
}
