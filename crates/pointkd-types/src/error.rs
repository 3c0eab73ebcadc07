//! Error types for pointkd.
//!
//! Two failure categories exist: configuration errors, raised before any
//! payload is produced, and corrupt-stream errors raised while decoding.
//! A failed call leaves any bytes already written to the sink invalid as
//! a whole; callers must discard the buffer, never splice it.

use thiserror::Error;

/// Result type alias for pointkd operations.
pub type Result<T> = std::result::Result<T, PointKdError>;

/// Main error type for pointkd encode/decode calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PointKdError {
    /// The encoder accepts exactly one source attribute.
    #[error("expected exactly one source attribute, got {0}")]
    UnsupportedAttributeCount(usize),

    /// The attribute's component count does not match the fixed dimensionality.
    #[error("attribute must have 3 components, got {0}")]
    UnsupportedComponentCount(usize),

    /// Float attributes require a configured positive quantization bit count.
    #[error("float attribute has no positive quantization bit count configured")]
    MissingQuantization,

    /// Compression level outside the closed 0..=10 range.
    #[error("compression level {0} outside valid range 0..=10")]
    InvalidCompressionLevel(u8),

    /// Encoding speed outside the 0..=10 knob range.
    #[error("encoding speed {0} outside valid range 0..=10")]
    InvalidEncodingSpeed(u8),

    /// Method byte in the stream header is not a known encoding method.
    #[error("unknown encoding method id {0}")]
    InvalidEncodingMethod(u8),

    /// Decoder input is shorter or less consistent than the header implies.
    #[error("corrupt stream: {0}")]
    CorruptStream(&'static str),
}
