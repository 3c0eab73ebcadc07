//! Property test: any multiset of 3-D integer points round-trips exactly
//! as a multiset, at any compression level.

use proptest::prelude::*;

use pointkd_codec::{KdTreePointsDecoder, KdTreePointsEncoder};
use pointkd_types::{EncoderOptions, Point3, PointAttribute};
use pointkd_wire::EncoderBuffer;

fn round_trip(points: &[Point3], speed: u8) -> Vec<Point3> {
    let flat: Vec<u32> = points.iter().flat_map(|p| p.iter().copied()).collect();
    let att = PointAttribute::from_uint_values(flat, 3).unwrap();
    let mut out = EncoderBuffer::new();
    KdTreePointsEncoder::new(EncoderOptions {
        encoding_speed: speed,
        quantization_bits: None,
    })
    .encode(&[att], &mut out)
    .unwrap();
    KdTreePointsDecoder::decode(out.as_slice()).unwrap().points
}

proptest! {
    #[test]
    fn round_trip_is_multiset_identity(
        points in prop::collection::vec(
            (any::<u32>(), any::<u32>(), any::<u32>()).prop_map(|(x, y, z)| [x, y, z]),
            0..300,
        ),
        speed in 0u8..=10,
    ) {
        let mut decoded = round_trip(&points, speed);
        decoded.sort_unstable();
        let mut expected = points;
        expected.sort_unstable();
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn narrow_range_round_trip(
        points in prop::collection::vec(
            (0u32..4, 0u32..4, 0u32..4).prop_map(|(x, y, z)| [x, y, z]),
            0..64,
        ),
        speed in 0u8..=10,
    ) {
        // Tiny coordinate ranges maximize duplicate collisions and
        // zero-bit leaves.
        let mut decoded = round_trip(&points, speed);
        decoded.sort_unstable();
        let mut expected = points;
        expected.sort_unstable();
        prop_assert_eq!(decoded, expected);
    }
}
