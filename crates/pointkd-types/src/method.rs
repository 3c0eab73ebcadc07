//! Encoding method identifiers carried in the stream header.

use crate::error::PointKdError;

/// Which codec path produced the payload. Stored as the first header byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KdTreeEncodingMethod {
    /// Float attribute, pre-quantized upstream, coded as integers.
    QuantizedFloat = 0,
    /// Native unsigned integer attribute.
    DirectInteger = 1,
}

impl TryFrom<u8> for KdTreeEncodingMethod {
    type Error = PointKdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::QuantizedFloat),
            1 => Ok(Self::DirectInteger),
            other => Err(PointKdError::InvalidEncodingMethod(other)),
        }
    }
}
