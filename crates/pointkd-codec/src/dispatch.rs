//! Dispatch and stream header layer.
//!
//! Validates the attribute configuration, selects the float or integer
//! path, writes the fixed 6-byte header (method id, compression level,
//! point count) and appends the chosen codec's payload. Decoding mirrors
//! this: parse and validate the header, then run the matching decoder.
//!
//! A failed encode may already have written header bytes to the sink;
//! the stream is then invalid as a whole and callers must discard the
//! buffer, not just ignore the error.

use tracing::debug;

use pointkd_types::{
    AttributeDataType, CompressionLevel, EncoderOptions, KdTreeEncodingMethod, Point3,
    PointAttribute, PointKdError, Result, POINT_DIMS,
};
use pointkd_wire::{DecoderBuffer, EncoderBuffer};

use crate::float::QuantizedFloatEncoder;
use crate::kdtree::{IntegerKdTreeDecoder, IntegerKdTreeEncoder};
use crate::source::AttributePointSource;

/// Entry point for encoding one point-cloud position attribute.
pub struct KdTreePointsEncoder {
    options: EncoderOptions,
}

impl KdTreePointsEncoder {
    pub fn new(options: EncoderOptions) -> Self {
        Self { options }
    }

    /// Encode the attribute set into `out`: header first, then payload.
    ///
    /// Exactly one attribute with three components and a supported data
    /// type is accepted; anything else is a configuration error raised
    /// before the payload is produced.
    pub fn encode(&self, attributes: &[PointAttribute], out: &mut EncoderBuffer) -> Result<()> {
        let [attribute] = attributes else {
            return Err(PointKdError::UnsupportedAttributeCount(attributes.len()));
        };
        if attribute.components() != POINT_DIMS {
            return Err(PointKdError::UnsupportedComponentCount(attribute.components()));
        }
        let level = CompressionLevel::from_speed(self.options.encoding_speed)?;
        let num_points = attribute.len() as u32;
        let source = AttributePointSource::new(attribute);

        match attribute.data_type() {
            AttributeDataType::Float32 => {
                // Validate the quantization config before emitting anything.
                let encoder = QuantizedFloatEncoder::new(self.options.quantization_bits, level)?;
                debug!(num_points, level = level.get(), "dispatch: quantized-float path");
                write_header(out, KdTreeEncodingMethod::QuantizedFloat, level, num_points);
                encoder.encode_points(&source, out)
            }
            AttributeDataType::Uint32 => {
                debug!(num_points, level = level.get(), "dispatch: direct-integer path");
                write_header(out, KdTreeEncodingMethod::DirectInteger, level, num_points);
                IntegerKdTreeEncoder::new(level).encode_points(&source, out)
            }
        }
    }
}

fn write_header(
    out: &mut EncoderBuffer,
    method: KdTreeEncodingMethod,
    level: CompressionLevel,
    num_points: u32,
) {
    out.put_u8(method as u8);
    out.put_u8(level.get());
    out.put_u32_le(num_points);
}

/// A decoded stream: header fields plus the reconstructed point set.
///
/// For the quantized-float method the points are the upstream
/// quantization grid values; mapping them back to floats belongs to the
/// external dequantizer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedPointCloud {
    pub method: KdTreeEncodingMethod,
    pub compression_level: CompressionLevel,
    /// Points in recursion order (implementation-defined, stable).
    pub points: Vec<Point3>,
}

/// Entry point for decoding a stream produced by [`KdTreePointsEncoder`].
pub struct KdTreePointsDecoder;

impl KdTreePointsDecoder {
    /// Parse the header, select the matching decoder and reconstruct the
    /// point set.
    pub fn decode(data: &[u8]) -> Result<DecodedPointCloud> {
        let mut buf = DecoderBuffer::new(data);
        let method = KdTreeEncodingMethod::try_from(buf.take_u8()?)?;
        let compression_level = CompressionLevel::new(buf.take_u8()?)?;
        let num_points = buf.take_u32_le()?;
        debug!(?method, num_points, level = compression_level.get(), "dispatch: decode");

        // Both methods carry an integer-coded payload; they differ only in
        // what the coordinates mean to the layer above.
        let points =
            IntegerKdTreeDecoder::new(compression_level).decode_points(num_points, &mut buf)?;
        Ok(DecodedPointCloud {
            method,
            compression_level,
            points,
        })
    }
}
