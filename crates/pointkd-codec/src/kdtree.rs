//! Recursive integer k-d tree encoder and decoder.
//!
//! The partition tree is never stored. Both sides derive every split
//! decision from shared state (subset size, per-axis base and remaining
//! bit depth), so the decoder replays the encoder's recursion exactly.
//! The split rule is fixed across all levels: split the axis with the
//! most remaining bits (lowest index wins ties) at the midpoint of its
//! remaining range. Levels differ only in how split counts are coded.
//!
//! Payload layout, following the 6-byte stream header (all LE):
//!
//! ```text
//! bit_length   (1 byte)  uniform per-axis initial bit depth, <= 32
//! count_len    (4 bytes) byte length of the count stream
//! count stream           strategy-coded split counts
//! leaf stream            raw-bit coded leaf coordinates
//! ```
//!
//! The encoder works on a private copy of the input: the recursion
//! partitions its working buffer in place and must never touch the
//! caller's storage. Decoded points come back in recursion order, which
//! is implementation-defined but stable for a given input.

use tracing::debug;

use pointkd_types::{bit_width, CompressionLevel, Point3, PointKdError, Result, MAX_BIT_LENGTH, POINT_DIMS};
use pointkd_wire::{BitReader, BitWriter, DecoderBuffer, EncoderBuffer};

use crate::count::{count_decoder, count_encoder, CountDecoding, CountEncoding};
use crate::source::PointSource;

/// Subsets at or below this size are coded directly instead of split.
pub const LEAF_THRESHOLD: usize = 2;

/// Upper bound on the decoder's initial point reservation. The count in
/// the header is untrusted input; past this bound the vector grows as
/// points actually arrive.
const MAX_INITIAL_POINT_RESERVE: usize = 1 << 20;

/// Per-node recursion state shared by encoder and decoder.
#[derive(Clone, Copy)]
struct NodeBounds {
    /// Minimum corner of the node's range on each axis.
    base: Point3,
    /// Remaining bit depth on each axis; the range spans `2^bits`.
    bits: [u32; POINT_DIMS],
}

impl NodeBounds {
    fn root(bit_length: u32) -> Self {
        Self {
            base: [0; POINT_DIMS],
            bits: [bit_length; POINT_DIMS],
        }
    }

    fn total_bits(&self) -> u32 {
        self.bits.iter().sum()
    }

    /// Axis with the most remaining bits; lowest index breaks ties.
    fn split_axis(&self) -> usize {
        let mut axis = 0;
        for candidate in 1..POINT_DIMS {
            if self.bits[candidate] > self.bits[axis] {
                axis = candidate;
            }
        }
        axis
    }

    /// Children after splitting `axis` at the midpoint of its range.
    fn split(&self, axis: usize) -> (NodeBounds, NodeBounds, u32) {
        let mut child = *self;
        child.bits[axis] -= 1;
        let half = 1u32 << child.bits[axis];
        let low = child;
        let mut high = child;
        high.base[axis] += half;
        (low, high, self.base[axis] + half)
    }
}

/// Losslessly compresses a multiset of 3-D integer points.
pub struct IntegerKdTreeEncoder {
    level: CompressionLevel,
}

impl IntegerKdTreeEncoder {
    pub fn new(level: CompressionLevel) -> Self {
        Self { level }
    }

    /// Encode all points of `source` and append the payload to `out`.
    ///
    /// Copies the source into a private working buffer first; the
    /// recursion reorders that buffer destructively.
    pub fn encode_points(&self, source: &dyn PointSource, out: &mut EncoderBuffer) -> Result<()> {
        let mut working: Vec<Point3> = (0..source.len()).map(|i| source.point(i)).collect();

        let max_coord = working
            .iter()
            .flat_map(|p| p.iter().copied())
            .max()
            .unwrap_or(0);
        let bit_length = bit_width(max_coord);
        debug!(
            num_points = working.len(),
            bit_length,
            level = self.level.get(),
            "kd-tree encode"
        );

        let mut counts = count_encoder(self.level);
        let mut leaves = BitWriter::new();
        encode_subset(
            &mut working,
            NodeBounds::root(bit_length),
            counts.as_mut(),
            &mut leaves,
        );

        let count_bytes = counts.finish();
        let leaf_bytes = leaves.finish();
        out.put_u8(bit_length as u8);
        out.put_u32_le(count_bytes.len() as u32);
        out.put_bytes(&count_bytes);
        out.put_bytes(&leaf_bytes);
        Ok(())
    }
}

fn encode_subset(
    points: &mut [Point3],
    bounds: NodeBounds,
    counts: &mut dyn CountEncoding,
    leaves: &mut BitWriter,
) {
    let n = points.len();
    if n == 0 {
        return;
    }
    if n <= LEAF_THRESHOLD || bounds.total_bits() == 0 {
        for point in points.iter() {
            for axis in 0..POINT_DIMS {
                leaves.write_bits(point[axis] - bounds.base[axis], bounds.bits[axis]);
            }
        }
        return;
    }

    let axis = bounds.split_axis();
    let (low_bounds, high_bounds, split_value) = bounds.split(axis);
    let left = partition(points, axis, split_value);
    counts.encode(left as u32, n as u32);

    let (low, high) = points.split_at_mut(left);
    encode_subset(low, low_bounds, counts, leaves);
    encode_subset(high, high_bounds, counts, leaves);
}

/// In-place partition: points with `coord < split` move to the front.
/// Returns how many landed there.
fn partition(points: &mut [Point3], axis: usize, split: u32) -> usize {
    let mut i = 0;
    let mut j = points.len();
    while i < j {
        if points[i][axis] < split {
            i += 1;
        } else {
            j -= 1;
            points.swap(i, j);
        }
    }
    i
}

/// Mirror of [`IntegerKdTreeEncoder`].
pub struct IntegerKdTreeDecoder {
    level: CompressionLevel,
}

impl IntegerKdTreeDecoder {
    pub fn new(level: CompressionLevel) -> Self {
        Self { level }
    }

    /// Decode `num_points` points from the payload in `buf`.
    pub fn decode_points(&self, num_points: u32, buf: &mut DecoderBuffer<'_>) -> Result<Vec<Point3>> {
        let bit_length = buf.take_u8()?;
        if bit_length > MAX_BIT_LENGTH {
            return Err(PointKdError::CorruptStream("bit length exceeds 32"));
        }
        let count_len = buf.take_u32_le()? as usize;
        let count_bytes = buf.take_bytes(count_len)?;
        let leaf_bytes = buf.take_rest();
        debug!(num_points, bit_length, level = self.level.get(), "kd-tree decode");

        let mut counts = count_decoder(self.level, count_bytes);
        let mut leaves = BitReader::new(leaf_bytes);
        let mut points =
            Vec::with_capacity((num_points as usize).min(MAX_INITIAL_POINT_RESERVE));
        decode_subset(
            num_points,
            NodeBounds::root(u32::from(bit_length)),
            counts.as_mut(),
            &mut leaves,
            &mut points,
        )?;
        Ok(points)
    }
}

fn decode_subset(
    n: u32,
    bounds: NodeBounds,
    counts: &mut dyn CountDecoding,
    leaves: &mut BitReader<'_>,
    out: &mut Vec<Point3>,
) -> Result<()> {
    if n == 0 {
        return Ok(());
    }
    if n as usize <= LEAF_THRESHOLD || bounds.total_bits() == 0 {
        for _ in 0..n {
            let mut point = [0u32; POINT_DIMS];
            for axis in 0..POINT_DIMS {
                point[axis] = bounds.base[axis] + leaves.read_bits(bounds.bits[axis])?;
            }
            out.push(point);
        }
        return Ok(());
    }

    let axis = bounds.split_axis();
    let (low_bounds, high_bounds, _) = bounds.split(axis);
    let left = counts.decode(n)?;

    decode_subset(left, low_bounds, counts, leaves, out)?;
    decode_subset(n - left, high_bounds, counts, leaves, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(points: &[Point3], level: u8) -> Vec<Point3> {
        let level = CompressionLevel::new(level).unwrap();
        let mut out = EncoderBuffer::new();
        IntegerKdTreeEncoder::new(level)
            .encode_points(&points.to_vec(), &mut out)
            .unwrap();

        let bytes = out.into_vec();
        let mut buf = DecoderBuffer::new(&bytes);
        IntegerKdTreeDecoder::new(level)
            .decode_points(points.len() as u32, &mut buf)
            .unwrap()
    }

    fn as_multiset(points: &[Point3]) -> Vec<Point3> {
        let mut sorted = points.to_vec();
        sorted.sort_unstable();
        sorted
    }

    #[test]
    fn empty_set() {
        for level in [0, 5, 10] {
            assert!(round_trip(&[], level).is_empty());
        }
    }

    #[test]
    fn single_point_skips_splitting() {
        let points = [[123u32, 456, 789]];
        for level in [0, 5, 10] {
            assert_eq!(round_trip(&points, level), points);
        }
    }

    #[test]
    fn threshold_boundary() {
        // Exactly at the leaf threshold: direct path, no counts.
        let at = [[1u32, 2, 3], [4, 5, 6]];
        // One above: forces at least one split.
        let above = [[1u32, 2, 3], [4, 5, 6], [7, 8, 9]];
        for level in 0..=10 {
            assert_eq!(as_multiset(&round_trip(&at, level)), as_multiset(&at));
            assert_eq!(as_multiset(&round_trip(&above, level)), as_multiset(&above));
        }
    }

    #[test]
    fn duplicates_survive() {
        let points = [[7u32, 7, 7], [7, 7, 7], [7, 7, 7], [1, 2, 3]];
        for level in 0..=10 {
            assert_eq!(as_multiset(&round_trip(&points, level)), as_multiset(&points));
        }
    }

    #[test]
    fn identical_points_only() {
        // All-equal multiset collapses every range to zero bits; the leaf
        // path must still reproduce the duplicate count.
        let points = vec![[42u32, 0, 9]; 17];
        for level in [0, 6, 9] {
            assert_eq!(round_trip(&points, level), points);
        }
    }

    #[test]
    fn max_width_coordinates() {
        let points = [
            [u32::MAX, 0, u32::MAX],
            [0, u32::MAX, 0],
            [u32::MAX, u32::MAX, u32::MAX],
            [0, 0, 0],
            [1 << 31, 1 << 15, 1],
        ];
        for level in [0, 5, 10] {
            assert_eq!(as_multiset(&round_trip(&points, level)), as_multiset(&points));
        }
    }

    #[test]
    fn partition_splits_in_place() {
        let mut points = vec![[5u32, 0, 0], [1, 0, 0], [9, 0, 0], [3, 0, 0]];
        let left = partition(&mut points, 0, 4);
        assert_eq!(left, 2);
        assert!(points[..left].iter().all(|p| p[0] < 4));
        assert!(points[left..].iter().all(|p| p[0] >= 4));
    }

    #[test]
    fn split_axis_prefers_widest_then_lowest() {
        let bounds = NodeBounds {
            base: [0; 3],
            bits: [3, 5, 4],
        };
        assert_eq!(bounds.split_axis(), 1);
        let tied = NodeBounds {
            base: [0; 3],
            bits: [4, 4, 4],
        };
        assert_eq!(tied.split_axis(), 0);
    }

    #[test]
    fn encoding_is_deterministic() {
        let points: Vec<Point3> = (0..100u32).map(|i| [i * 3 % 64, i * 7 % 64, i % 64]).collect();
        for level in [0, 6, 10] {
            let level = CompressionLevel::new(level).unwrap();
            let encode = || {
                let mut out = EncoderBuffer::new();
                IntegerKdTreeEncoder::new(level)
                    .encode_points(&points, &mut out)
                    .unwrap();
                out.into_vec()
            };
            assert_eq!(encode(), encode());
        }
    }

    #[test]
    fn truncated_payload_is_corrupt() {
        let points: Vec<Point3> = (0..50u32).map(|i| [i, i * 2, i * 5]).collect();
        let level = CompressionLevel::new(0).unwrap();
        let mut out = EncoderBuffer::new();
        IntegerKdTreeEncoder::new(level)
            .encode_points(&points, &mut out)
            .unwrap();
        let bytes = out.into_vec();

        for cut in 0..bytes.len() {
            let mut buf = DecoderBuffer::new(&bytes[..cut]);
            let result = IntegerKdTreeDecoder::new(level).decode_points(50, &mut buf);
            assert!(result.is_err(), "prefix of {cut} bytes decoded");
        }
    }
}
