//! Quantized-float front end.
//!
//! Float attributes only reach the codec after an upstream quantization
//! transform has mapped each coordinate onto an integer grid. This front
//! end checks that a positive quantization precision is actually
//! configured (there is no sensible default to fall back on), then feeds
//! the grid values to the integer codec unchanged. It adds no header
//! fields of its own; the payload is the integer codec's payload.

use pointkd_types::{CompressionLevel, PointKdError, Result};
use pointkd_wire::EncoderBuffer;

use crate::kdtree::IntegerKdTreeEncoder;
use crate::source::PointSource;

/// Encoder for float attributes pre-quantized upstream.
pub struct QuantizedFloatEncoder {
    quantization_bits: u8,
    inner: IntegerKdTreeEncoder,
}

impl QuantizedFloatEncoder {
    /// Fails with a configuration error unless `quantization_bits` is
    /// present and positive.
    pub fn new(quantization_bits: Option<u8>, level: CompressionLevel) -> Result<Self> {
        match quantization_bits {
            Some(bits) if bits > 0 => Ok(Self {
                quantization_bits: bits,
                inner: IntegerKdTreeEncoder::new(level),
            }),
            _ => Err(PointKdError::MissingQuantization),
        }
    }

    /// Bits per coordinate the upstream quantizer was configured with.
    pub fn quantization_bits(&self) -> u8 {
        self.quantization_bits
    }

    /// Encode the quantized grid values through the integer codec.
    pub fn encode_points(&self, source: &dyn PointSource, out: &mut EncoderBuffer) -> Result<()> {
        self.inner.encode_points(source, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointkd_types::Point3;
    use pointkd_wire::DecoderBuffer;

    use crate::kdtree::IntegerKdTreeDecoder;

    #[test]
    fn missing_precision_is_config_error() {
        let level = CompressionLevel::new(5).unwrap();
        assert_eq!(
            QuantizedFloatEncoder::new(None, level).err(),
            Some(PointKdError::MissingQuantization)
        );
        assert_eq!(
            QuantizedFloatEncoder::new(Some(0), level).err(),
            Some(PointKdError::MissingQuantization)
        );
    }

    #[test]
    fn grid_values_round_trip_through_integer_codec() {
        let level = CompressionLevel::new(5).unwrap();
        let encoder = QuantizedFloatEncoder::new(Some(11), level).unwrap();
        assert_eq!(encoder.quantization_bits(), 11);

        let points: Vec<Point3> = vec![[0, 2047, 12], [55, 0, 2047], [1024, 1024, 1024]];
        let mut out = EncoderBuffer::new();
        encoder.encode_points(&points, &mut out).unwrap();

        let bytes = out.into_vec();
        let mut buf = DecoderBuffer::new(&bytes);
        let mut decoded = IntegerKdTreeDecoder::new(level)
            .decode_points(points.len() as u32, &mut buf)
            .unwrap();
        decoded.sort_unstable();
        let mut expected = points;
        expected.sort_unstable();
        assert_eq!(decoded, expected);
    }
}
