//! Shared data model for the pointkd point-cloud compression format:
//! point vectors, the read-only attribute store, encoder options, the
//! compression level, wire constants, and the error taxonomy.

pub mod attribute;
pub mod constants;
pub mod error;
pub mod method;
pub mod options;
pub mod point;

pub use attribute::{AttributeDataType, PointAttribute};
pub use constants::{MAX_BIT_LENGTH, MAX_COMPRESSION_LEVEL, POINT_DIMS, STREAM_HEADER_SIZE};
pub use error::{PointKdError, Result};
pub use method::KdTreeEncodingMethod;
pub use options::{CompressionLevel, EncoderOptions};
pub use point::{bit_width, Point3};
