//! Lossless k-d tree compression of point-cloud attribute data.
//!
//! Points are compressed by recursive axis-aligned spatial splitting:
//! each tree node partitions its point subset at the midpoint of the
//! widest remaining per-axis bit range and stores only the size of one
//! half; subsets at or below the leaf threshold store their coordinates
//! directly at the minimal width for the node's bounding range. The
//! decoder recomputes every split decision from the same state, so the
//! tree itself never hits the wire.
//!
//! The compression level (0..=10, carried in the stream header) selects
//! one of a closed set of count-coding strategies, trading CPU for
//! payload size. Integer attributes round-trip bit exactly; float
//! attributes round-trip to their upstream quantization grid.

pub mod count;
pub mod dispatch;
pub mod float;
pub mod kdtree;
pub mod source;

pub use dispatch::{DecodedPointCloud, KdTreePointsDecoder, KdTreePointsEncoder};
pub use float::QuantizedFloatEncoder;
pub use kdtree::{IntegerKdTreeDecoder, IntegerKdTreeEncoder};
pub use source::{AttributePointSource, PointSource};
